//! The synthetic point cloud and the camera orbiting around it.

use bytemuck::{Pod, Zeroable};
use pasture_core::containers::VectorBuffer;
use pasture_core::nalgebra::{Matrix4, Point3, Vector3};
use pasture_derive::PointType;
use pcx_renderer::renderer::backends::glium::FrameMatrices;
use std::f64::consts::{PI, TAU};
use std::time::Duration;

#[repr(C, packed)]
#[derive(Clone, Copy, Debug, PartialEq, Default, PointType, Pod, Zeroable)]
pub struct SamplePoint {
    #[pasture(BUILTIN_POSITION_3D)]
    pub position: Vector3<f64>,
    #[pasture(BUILTIN_COLOR_RGB)]
    pub color: Vector3<u16>,
}

/// Distributes the points evenly on the surface of a sphere around the origin.
/// Each point is colored by its direction from the center.
pub fn fibonacci_sphere(point_count: usize, radius: f64) -> VectorBuffer {
    let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
    (0..point_count)
        .map(|i| {
            let y = if point_count > 1 {
                1.0 - 2.0 * i as f64 / (point_count - 1) as f64
            } else {
                0.0
            };
            let ring_radius = (1.0 - y * y).max(0.0).sqrt();
            let theta = golden_angle * i as f64;
            let normal = Vector3::new(theta.cos() * ring_radius, y, theta.sin() * ring_radius);
            let color = normal.map(|c| ((c * 0.5 + 0.5) * u16::MAX as f64).round() as u16);
            SamplePoint {
                position: normal * radius,
                color,
            }
        })
        .collect()
}

/// A camera circling around the origin, looking at it.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    pub distance: f64,
    pub speed: f64,
    pub fov_y: f64,
    pub angle: f64,
}

impl OrbitCamera {
    pub fn new(distance: f64, speed: f64, fov_y_degrees: f64) -> Self {
        OrbitCamera {
            distance,
            speed,
            fov_y: fov_y_degrees.to_radians(),
            angle: 0.0,
        }
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.angle = (self.angle + self.speed * elapsed.as_secs_f64()).rem_euclid(TAU);
    }

    pub fn eye(&self) -> Point3<f64> {
        Point3::new(
            self.angle.sin() * self.distance,
            self.distance * 0.3,
            self.angle.cos() * self.distance,
        )
    }

    /// View and projection for a framebuffer of the given size.
    /// Returns `None` for an empty framebuffer (e.g. a minimized window).
    pub fn matrices(&self, width: u32, height: u32) -> Option<FrameMatrices> {
        if width == 0 || height == 0 {
            return None;
        }
        let aspect = width as f64 / height as f64;
        let view = Matrix4::look_at_rh(&self.eye(), &Point3::origin(), &Vector3::y());
        let z_near = (self.distance * 0.01).max(0.001);
        let z_far = self.distance * 10.0;
        let projection = Matrix4::new_perspective(aspect, self.fov_y, z_near, z_far);
        Some(FrameMatrices { view, projection })
    }
}
