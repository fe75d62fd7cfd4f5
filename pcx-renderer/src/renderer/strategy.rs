//! Decides, which shader a point cloud is drawn with.

use serde::{Deserialize, Serialize};

/// The two ways of rasterizing a point.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ShadingStrategy {
    /// Every point is a single pixel, drawn with the point shader.
    Point,

    /// Every point is a screen facing disk with a diameter of the point size in world units,
    /// drawn with the disk shader.
    Disk,
}

/// Selects the shading strategy for the current frame.
///
/// A point size of exactly zero, or forcing the point shader, selects [ShadingStrategy::Point].
/// Any other point size, including negative ones, selects [ShadingStrategy::Disk].
pub fn select_strategy(point_size: f32, force_point_shader: bool) -> ShadingStrategy {
    if point_size == 0.0 || force_point_shader {
        ShadingStrategy::Point
    } else {
        ShadingStrategy::Disk
    }
}

#[cfg(test)]
mod tests {
    use super::{ShadingStrategy, select_strategy};

    #[test]
    fn positive_sizes_use_disks() {
        for size in [f32::MIN_POSITIVE, 0.001, 0.05, 1.0, 1000.0] {
            assert_eq!(select_strategy(size, false), ShadingStrategy::Disk);
        }
    }

    #[test]
    fn zero_size_uses_points() {
        assert_eq!(select_strategy(0.0, false), ShadingStrategy::Point);
        assert_eq!(select_strategy(-0.0, false), ShadingStrategy::Point);
        assert_eq!(select_strategy(0.0, true), ShadingStrategy::Point);
    }

    #[test]
    fn forced_point_shader_wins() {
        for size in [0.0, 0.05, 1.0, -1.0] {
            assert_eq!(select_strategy(size, true), ShadingStrategy::Point);
        }
    }

    #[test]
    fn negative_sizes_are_not_clamped() {
        assert_eq!(select_strategy(-0.05, false), ShadingStrategy::Disk);
    }
}
