//! Settings for how a point cloud should look.

use serde::{Deserialize, Serialize};

/// Settings for how a single point cloud should be rendered.
///
/// These are the serializable fields of a point cloud renderer. They may be edited at any time
/// and are read once per frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointCloudRenderSettings {
    /// Color, that the point colors are multiplied with.
    pub point_tint: Color,

    /// Diameter of the disks, that the points are drawn as, in world units.
    ///
    /// A size of exactly `0.0` draws every point as a single pixel.
    /// The value is handed to the shader as is, so negative values are not rejected.
    pub point_size: f32,

    /// Always draw single pixel points, regardless of the point size.
    pub force_point_shader: bool,
}

/// An RGBA color value.
/// Each of the four channels should be in between 0.0 and 1.0.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// red
    pub r: f32,

    /// green
    pub g: f32,

    /// blue
    pub b: f32,

    /// alpha
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    /// Creates a color from a r, g, b, a component
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Color { r, g, b, a }
    }

    /// Creates an opaque color from a r, g, b component
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b, a: 1.0 }
    }

    /// The channels as an array, in the order r, g, b, a.
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const GREY_5: Color = Color::rgb(0.5, 0.5, 0.5);
}

impl Default for Color {
    fn default() -> Self {
        Color::GREY_5
    }
}

impl Default for PointCloudRenderSettings {
    fn default() -> Self {
        PointCloudRenderSettings {
            point_tint: Color::GREY_5,
            point_size: 0.05,
            force_point_shader: false,
        }
    }
}
