//! Contains all render backends that the point cloud renderer can be used with.
//!
//! At the current state of development, the [glium] backend is the only available one.

use crate::renderer::error::RendererResult;
use crate::renderer::material::Material;
use crate::renderer::point_data::{PointBuffer, PointRecord};

pub mod glium;

/// The graphics API, that materials and point buffers are created with.
///
/// Materials and buffers are handles, so cloning them is cheap and does not duplicate any
/// GPU resources.
pub trait RenderBackend {
    /// A shader, that materials can be created from.
    type Shader;

    /// GPU buffer holding [PointRecord]s.
    type Buffer: PointBuffer + Clone;

    type Material: Material<Buffer = Self::Buffer> + Clone;

    /// Human readable name of the backend, for error and log messages.
    fn name(&self) -> &'static str;

    /// Creates a new material instance for the given shader.
    fn create_material(&mut self, shader: &Self::Shader) -> RendererResult<Self::Material>;

    /// Uploads the given points into a new GPU buffer.
    fn create_point_buffer(&mut self, points: &[PointRecord]) -> RendererResult<Self::Buffer>;
}
