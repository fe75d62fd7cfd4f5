//! Render backend based on the `glium` crate.
mod destroy;
mod dynamic_drawing;
mod material;
mod point_buffer;
mod programs;
mod util;
mod window;

pub use destroy::{DeferredDestroy, ImmediateDestroy};
pub use material::{GliumMaterial, MaterialValue};
pub use point_buffer::GliumPointBuffer;
pub use programs::{GliumShader, ProgramKey, ProgramManager};
pub use window::{FrameHandler, GliumRenderOptions, run};

use crate::renderer::backends::RenderBackend;
use crate::renderer::backends::glium::dynamic_drawing::DynamicUniforms;
use crate::renderer::backends::glium::util::{camera_right_up, matrix_to_gl, vector_to_gl};
use crate::renderer::error::{RendererError, RendererResult};
use crate::renderer::material::{COMPUTE_BUFFER_KEYWORD, Material};
use crate::renderer::point_data::PointRecord;
use crate::renderer::render_pass::{DrawCommand, POINT_BUFFER_PROPERTY, Topology};
use glium::index::{NoIndices, PrimitiveType};
use glium::vertex::{EmptyInstanceAttributes, EmptyVertexAttributes};
use glium::{DepthTest, Display, DrawParameters, Surface};
use log::trace;
use pasture_core::nalgebra::Matrix4;

pub(crate) const BACKEND_NAME: &str = "Open GL (glium)";

/// Camera matrices of the current frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameMatrices {
    pub view: Matrix4<f64>,
    pub projection: Matrix4<f64>,
}

/// The OpenGL backend.
pub struct GliumBackend {
    display: Display,
    programs: ProgramManager,
}

impl GliumBackend {
    pub fn new(display: Display) -> Self {
        GliumBackend {
            display,
            programs: ProgramManager::new(),
        }
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    /// Executes a draw command produced by the render pass.
    pub fn submit<S>(
        &mut self,
        surface: &mut S,
        command: &DrawCommand<'_, GliumMaterial>,
        matrices: &FrameMatrices,
    ) -> RendererResult<()>
    where
        S: Surface,
    {
        if command.pass != 0 {
            return Err(RendererError::UnsupportedOperation {
                backend_name: BACKEND_NAME,
                operation_name: format!("Shader pass {}", command.pass),
                platform_specific: false,
            });
        }
        let material = command.material;
        if !material.is_keyword_enabled(COMPUTE_BUFFER_KEYWORD) {
            return Err(RendererError::UnsupportedOperation {
                backend_name: BACKEND_NAME,
                operation_name: format!(
                    "Drawing {} without {}",
                    material.shader_name(),
                    COMPUTE_BUFFER_KEYWORD
                ),
                platform_specific: false,
            });
        }
        if !material.has_value(POINT_BUFFER_PROPERTY) {
            return Err(RendererError::MissingProperty {
                name: POINT_BUFFER_PROPERTY,
            });
        }
        let program = material.program(&self.display, &mut self.programs)?;
        if command.vertex_count == 0 || command.instance_count == 0 {
            return Ok(());
        }

        let primitive_type = match command.topology {
            Topology::Points => PrimitiveType::Points,
        };
        let view_projection = matrix_to_gl(&(matrices.projection * matrices.view));
        let (right, up) = camera_right_up(&matrices.view);
        let (camera_right, camera_up) = (vector_to_gl(&right), vector_to_gl(&up));
        let draw_parameters = DrawParameters {
            depth: glium::Depth {
                write: true,
                test: DepthTest::IfLess,
                ..Default::default()
            },
            ..Default::default()
        };

        trace!(
            "Draw {} points with {} ({} instances)",
            command.vertex_count,
            material.shader_name(),
            command.instance_count
        );
        let mut frame_uniforms = DynamicUniforms::new();
        frame_uniforms.add("_ViewProjection", &view_projection);
        frame_uniforms.add("_CameraRight", &camera_right);
        frame_uniforms.add("_CameraUp", &camera_up);
        let vertices = EmptyVertexAttributes {
            len: command.vertex_count,
        };
        material
            .with_uniforms(frame_uniforms, |uniforms| {
                if command.instance_count == 1 {
                    surface.draw(
                        vertices,
                        NoIndices(primitive_type),
                        &program,
                        uniforms,
                        &draw_parameters,
                    )
                } else {
                    let instances = EmptyInstanceAttributes {
                        len: command.instance_count,
                    };
                    surface.draw(
                        (vertices, instances),
                        NoIndices(primitive_type),
                        &program,
                        uniforms,
                        &draw_parameters,
                    )
                }
            })
            .map_err(RendererError::graphics)
    }
}

impl RenderBackend for GliumBackend {
    type Shader = GliumShader;
    type Buffer = GliumPointBuffer;
    type Material = GliumMaterial;

    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn create_material(&mut self, shader: &GliumShader) -> RendererResult<GliumMaterial> {
        Ok(GliumMaterial::new(*shader))
    }

    fn create_point_buffer(&mut self, points: &[PointRecord]) -> RendererResult<GliumPointBuffer> {
        GliumPointBuffer::new(&self.display, points)
    }
}
