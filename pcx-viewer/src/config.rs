use anyhow::Context;
use pcx_renderer::renderer::camera::{Camera, Layer, LayerMask};
use pcx_renderer::renderer::settings::PointCloudRenderSettings;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// All settings of the viewer, as read from the config file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ViewerConfig {
    #[serde(default)]
    pub render: PointCloudRenderSettings,

    #[serde(default)]
    pub camera: CameraConfig,

    #[serde(default)]
    pub scene: SceneConfig,
}

/// The camera orbiting around the point cloud.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub name: String,

    /// The layers rendered by the camera.
    pub culling_mask: LayerMask,

    /// Distance of the camera from the center of the point cloud.
    pub distance: f64,

    /// Speed of the orbit in radians per second.
    pub orbit_speed: f64,

    /// Vertical field of view.
    pub fov_y_degrees: f64,
}

/// The synthetic point cloud.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    pub point_count: usize,
    pub radius: f64,

    /// Render layer of the point cloud.
    pub layer: Layer,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let default_toml = include_str!("defaults.toml");
        toml::from_str(default_toml).expect("defaults.toml is invalid.")
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            name: "Main Camera".to_string(),
            culling_mask: LayerMask::EVERYTHING,
            distance: 4.0,
            orbit_speed: 0.3,
            fov_y_degrees: 45.0,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            point_count: 100_000,
            radius: 1.0,
            layer: Layer::DEFAULT,
        }
    }
}

impl ViewerConfig {
    /// Reads the config from a toml file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config_toml = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        let config = toml::from_str(&config_toml)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Writes the default config to a new file. Fails, if the file already exists.
    pub fn write_default(path: &Path) -> anyhow::Result<()> {
        let default_config = ViewerConfig::default();
        let mut file = File::create_new(path)?;
        file.write_all(toml::to_string_pretty(&default_config)?.as_bytes())?;
        Ok(())
    }
}

impl CameraConfig {
    pub fn to_camera(&self) -> Camera {
        Camera::new(self.name.clone()).with_culling_mask(self.culling_mask)
    }
}
