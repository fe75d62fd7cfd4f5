//! The parts of a camera, that decide whether a point cloud is visible to it.

use crate::renderer::error::{RendererError, RendererResult};
use serde::{Deserialize, Serialize};

/// Name of the camera, that renders the thumbnails in material and asset previews.
/// Point clouds are never drawn for this camera.
pub const PREVIEW_CAMERA_NAME: &str = "Preview Scene Camera";

/// The render layer, that an object is assigned to.
///
/// A layer is a bit index into a [LayerMask], so there are 32 of them.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Layer(u8);

/// A set of render layers, with one bit per [Layer].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

/// The camera, that the current frame is being rendered for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    /// Name of the camera.
    pub name: String,

    /// The layers, that this camera renders.
    pub culling_mask: LayerMask,
}

impl Layer {
    pub const DEFAULT: Layer = Layer(0);

    /// Largest valid layer index.
    pub const MAX_INDEX: u8 = 31;

    /// Returns the layer with the given index, or an error if the index is larger than 31.
    pub fn new(index: u8) -> RendererResult<Self> {
        if index > Self::MAX_INDEX {
            return Err(RendererError::InvalidLayer { index });
        }
        Ok(Layer(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// The bit, that represents this layer in a [LayerMask].
    pub fn bit(self) -> u32 {
        1 << self.0
    }
}

impl TryFrom<u8> for Layer {
    type Error = RendererError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Layer::new(value)
    }
}

impl From<Layer> for u8 {
    fn from(layer: Layer) -> Self {
        layer.0
    }
}

impl LayerMask {
    pub const NOTHING: LayerMask = LayerMask(0);
    pub const EVERYTHING: LayerMask = LayerMask(u32::MAX);

    /// Checks, if the given layer is part of the mask.
    pub fn contains(self, layer: Layer) -> bool {
        self.0 & layer.bit() != 0
    }

    /// Returns the same mask with the given layer added.
    pub fn with(self, layer: Layer) -> Self {
        LayerMask(self.0 | layer.bit())
    }

    /// Returns the same mask with the given layer removed.
    pub fn without(self, layer: Layer) -> Self {
        LayerMask(self.0 & !layer.bit())
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::EVERYTHING
    }
}

impl Camera {
    /// A camera with the given name, that renders all layers.
    pub fn new(name: impl Into<String>) -> Self {
        Camera {
            name: name.into(),
            culling_mask: LayerMask::EVERYTHING,
        }
    }

    /// Returns the same camera, rendering only the given layers.
    pub fn with_culling_mask(self, culling_mask: LayerMask) -> Self {
        Camera {
            culling_mask,
            ..self
        }
    }

    /// True, if this is the camera rendering material and asset previews.
    pub fn is_preview(&self) -> bool {
        self.name == PREVIEW_CAMERA_NAME
    }

    /// True, if objects on the given layer are rendered by this camera.
    pub fn renders_layer(&self, layer: Layer) -> bool {
        self.culling_mask.contains(layer)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Camera::new("Main Camera")
    }
}
