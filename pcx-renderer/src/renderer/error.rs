//! Error types returned by the renderer and its backends.

use pasture_core::layout::PointAttributeDefinition;
use std::error::Error;
use thiserror::Error;

/// Shorthand for a [Result] with a [RendererError].
pub type RendererResult<T> = Result<T, RendererError>;

/// Error type returned by the renderer.
///
/// Note, that a frame, that is skipped because there is nothing to draw or because the point
/// cloud is not visible to the current camera, is not an error.
#[derive(Debug, Error)]
pub enum RendererError {
    /// Some GPU operation was unsuccessful (e.g. because of not sufficient graphics memory,
    /// or because a shader failed to compile)
    #[error("Gpu error: {source}")]
    Graphics { source: Box<dyn Error + Send + Sync> },

    /// Operation is not supported by the selected backend on the current platform.
    #[error("The graphics backend `{backend_name}` does not support `{operation_name}`{}.", platform_suffix(.platform_specific))]
    UnsupportedOperation {
        /// Name of the backend that is in use.
        backend_name: &'static str,

        /// Operation that was attempted.
        operation_name: String,

        /// True, if this is not available on this specific platform (e.g. because some GL extension is missing etc...).
        /// False, if the operation is not supported by the backend in general.
        platform_specific: bool,
    },

    /// A draw command was executed with a material, that lacks a property the shader needs.
    #[error("The material has no value for the shader property `{name}`.")]
    MissingProperty { name: &'static str },

    /// A draw command was executed with a material, that has already been destroyed.
    #[error("The material has already been destroyed.")]
    MaterialDestroyed,

    /// Render layers are bit indices into a 32 bit culling mask.
    #[error("Invalid render layer {index}. Layers must be in the range 0..=31.")]
    InvalidLayer { index: u8 },

    /// The points handed to the renderer do not have the attributes it needs.
    #[error("The attribute {attribute} {problem}.")]
    AttributeMismatch {
        attribute: PointAttributeDefinition,
        problem: AttributeMismatchType,
    },
}

/// Details the reason for an [RendererError::AttributeMismatch] error.
#[derive(Debug, Error)]
pub enum AttributeMismatchType {
    /// A required attribute does not exist in the point buffer.
    #[error("is not present in the point cloud")]
    DoesNotExist,

    /// The attribute exists, but is of the wrong type.
    #[error("is of the wrong type")]
    WrongType,
}

fn platform_suffix(platform_specific: &bool) -> &'static str {
    if *platform_specific {
        " on this platform"
    } else {
        ""
    }
}

impl RendererError {
    /// Wraps an error reported by the graphics API.
    pub fn graphics<E>(source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        RendererError::Graphics {
            source: Box::new(source),
        }
    }
}
