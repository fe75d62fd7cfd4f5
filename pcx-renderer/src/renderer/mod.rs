//! Contains everything related to drawing point clouds.
//!
//! The renderer is split into two parts: The [render_pass] decides once per frame, if and how a
//! point cloud is drawn, and keeps the materials it needs alive. It does not know about any
//! graphics API. A render backend does the actual heavylifting: it compiles the shaders, owns the
//! GPU buffers and executes the draw commands produced by the render pass.
pub mod backends;
pub mod camera;
pub mod error;
pub mod material;
pub mod point_data;
pub mod render_pass;
pub mod settings;
pub mod strategy;

#[cfg(test)]
pub(crate) mod test_utils;
