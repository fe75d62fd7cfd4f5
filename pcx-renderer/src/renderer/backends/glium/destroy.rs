//! The two ways of destroying materials, that the host can choose from.

use crate::renderer::backends::glium::material::GliumMaterial;
use crate::renderer::material::MaterialDestroyer;
use log::debug;

/// Destroys materials at once.
/// Used while editing, where no frame is in flight.
#[derive(Copy, Clone, Debug, Default)]
pub struct ImmediateDestroy;

impl MaterialDestroyer<GliumMaterial> for ImmediateDestroy {
    fn destroy(&mut self, material: GliumMaterial) {
        debug!("Destroying material {:?}", material);
        material.destroy_now();
    }
}

/// Collects materials and destroys them, when [DeferredDestroy::flush] is called at the end of
/// the frame.
/// Used while the application is running, because the material might still be referenced by
/// a draw call of the current frame.
#[derive(Debug, Default)]
pub struct DeferredDestroy {
    pending: Vec<GliumMaterial>,
}

impl DeferredDestroy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of materials waiting to be destroyed.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Destroys all collected materials.
    pub fn flush(&mut self) {
        if !self.pending.is_empty() {
            debug!("Destroying {} deferred material(s)", self.pending.len());
        }
        for material in self.pending.drain(..) {
            material.destroy_now();
        }
    }
}

impl MaterialDestroyer<GliumMaterial> for DeferredDestroy {
    fn destroy(&mut self, material: GliumMaterial) {
        if !self.pending.iter().any(|m| m.same_material(&material)) {
            self.pending.push(material);
        }
    }
}

impl Drop for DeferredDestroy {
    fn drop(&mut self) {
        self.flush();
    }
}
