use crate::renderer::backends::glium::BACKEND_NAME;
use crate::renderer::error::{RendererError, RendererResult};
use crate::renderer::point_data::{PointBuffer, PointRecord};
use glium::buffer::{Buffer, BufferCreationError, BufferMode, BufferType};
use glium::implement_uniform_block;
use glium::uniforms::{UniformBlock, UniformValue};
use glium::Display;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

implement_uniform_block!(PointRecord, position, color);

/// Shader storage buffer holding [PointRecord]s.
///
/// Cloning the buffer yields a new handle to the same GPU buffer.
#[derive(Clone)]
pub struct GliumPointBuffer {
    buffer: Rc<Buffer<[PointRecord]>>,
}

impl GliumPointBuffer {
    pub fn new(display: &Display, points: &[PointRecord]) -> RendererResult<Self> {
        let buffer = Buffer::new(
            display,
            points,
            BufferType::ShaderStorageBuffer,
            BufferMode::Default,
        )
        .map_err(|e| match e {
            BufferCreationError::BufferTypeNotSupported => RendererError::UnsupportedOperation {
                backend_name: BACKEND_NAME,
                operation_name: "Shader storage buffers".to_string(),
                platform_specific: true,
            },
            e => RendererError::graphics(e),
        })?;
        Ok(GliumPointBuffer {
            buffer: Rc::new(buffer),
        })
    }

    /// Binds the whole buffer to a shader storage block.
    pub fn as_uniform_value(&self) -> UniformValue<'_> {
        fn matches(
            block: &glium::program::UniformBlock,
        ) -> Result<(), glium::uniforms::LayoutMismatchError> {
            <[PointRecord] as UniformBlock>::matches(&block.layout, 0)
        }

        UniformValue::Block(self.buffer.as_slice_any(), matches)
    }
}

impl PointBuffer for GliumPointBuffer {
    fn len(&self) -> usize {
        self.buffer.len()
    }
}

impl Debug for GliumPointBuffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GliumPointBuffer")
            .field("len", &self.buffer.len())
            .finish()
    }
}
