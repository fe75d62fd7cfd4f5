use clap::Parser;
use std::path::PathBuf;

/// Shows a synthetic point cloud, drawn either as single pixel points or as disks.
///
/// Keys: `f` toggles the point shader, `+` / `-` scale the point size, `0` sets the point size
/// to zero, `c` toggles the custom point material.
#[derive(Debug, Parser)]
pub struct AppOptions {
    /// Verbosity of the command line output.
    #[clap(long, default_value = "info")]
    pub log_level: log::Level,

    /// Path to a toml file with the viewer settings.
    #[clap(long, short)]
    pub config: Option<PathBuf>,

    /// Writes the default settings to the given file and exits.
    #[clap(long, value_name = "FILE")]
    pub write_default_config: Option<PathBuf>,

    /// Diameter of the point disks in world units. Zero draws single pixel points.
    /// Overrides the value from the config file.
    #[clap(long, allow_hyphen_values = true)]
    pub point_size: Option<f32>,

    /// Always draw single pixel points.
    #[clap(long)]
    pub force_point_shader: bool,

    /// Number of points to generate. Overrides the value from the config file.
    #[clap(long)]
    pub point_count: Option<usize>,

    /// Start with the custom point material, that draws all points in the tint color.
    #[clap(long)]
    pub custom_point_material: bool,

    /// Destroy materials immediately, instead of at the end of the frame.
    #[clap(long)]
    pub edit_mode: bool,

    /// The multisampling level. Must be a power of two, or zero to disable multisampling.
    #[clap(long, default_value = "2")]
    pub multisampling: u16,
}
