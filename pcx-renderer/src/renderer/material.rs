//! Materials and the lifecycle of the two material instances, that a point cloud renderer uses.
//!
//! The renderer needs one material for the point shader and one for the disk shader. Both are
//! created lazily, the first time they are needed. Instead of creating the point material, a
//! custom material supplied by the user can be used. The custom material stays owned by
//! whoever supplied it: The renderer configures it, but never destroys it.
//!
//! Destroying a material is done through a [MaterialDestroyer], that is supplied by the host.
//! This allows the host to decide between destroying at once (edit mode, previews), or at the
//! end of the frame (live mode).

use crate::renderer::backends::RenderBackend;
use crate::renderer::error::RendererResult;
use crate::renderer::point_data::PointBuffer;
use crate::renderer::settings::Color;
use log::debug;
use pasture_core::nalgebra::Matrix4;

/// Shader keyword, that makes the point and disk shaders read the points from the point buffer.
pub const COMPUTE_BUFFER_KEYWORD: &str = "_COMPUTE_BUFFER";

/// Controls, whether a material is persisted together with the scene.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum HideFlags {
    /// Saved like any other object.
    #[default]
    None,

    /// Runtime-only object. It is never written to disk.
    DontSave,
}

/// A shader program together with its uniform values.
///
/// Materials are handles: Cloning a material yields a second handle to the same material, so
/// changes made through one handle are visible through the other.
pub trait Material {
    /// Type of the point buffers, that can be bound to the material.
    type Buffer: PointBuffer;

    /// Enables a shader keyword, selecting a variant of the shader.
    fn enable_keyword(&mut self, keyword: &'static str);

    fn is_keyword_enabled(&self, keyword: &str) -> bool;

    fn set_hide_flags(&mut self, flags: HideFlags);

    fn hide_flags(&self) -> HideFlags;

    fn set_color(&mut self, name: &'static str, color: Color);

    fn set_matrix(&mut self, name: &'static str, matrix: &Matrix4<f64>);

    /// Binds a point buffer. The material keeps a handle to the buffer, the point data is never
    /// copied.
    fn set_buffer(&mut self, name: &'static str, buffer: &Self::Buffer);

    fn set_float(&mut self, name: &'static str, value: f32);
}

/// Destroys materials, that are no longer needed.
pub trait MaterialDestroyer<M> {
    fn destroy(&mut self, material: M);
}

/// The point material, tagged with who owns it.
#[derive(Clone, Debug)]
pub enum MaterialSlot<M> {
    /// Created by the renderer. The renderer is responsible for destroying it.
    Owned(M),

    /// The user supplied custom material. It is never destroyed by the renderer.
    Borrowed(M),
}

impl<M> MaterialSlot<M> {
    pub fn material(&self) -> &M {
        match self {
            MaterialSlot::Owned(m) | MaterialSlot::Borrowed(m) => m,
        }
    }

    pub fn material_mut(&mut self) -> &mut M {
        match self {
            MaterialSlot::Owned(m) | MaterialSlot::Borrowed(m) => m,
        }
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self, MaterialSlot::Borrowed(_))
    }
}

/// Owns the point and disk material of a point cloud renderer.
#[derive(Debug)]
pub struct MaterialResources<M> {
    point: Option<MaterialSlot<M>>,
    disk: Option<M>,
}

impl<M> Default for MaterialResources<M> {
    fn default() -> Self {
        MaterialResources {
            point: None,
            disk: None,
        }
    }
}

/// Applies the settings, that every material used by the renderer needs.
fn prepare<M: Material>(material: &mut M) {
    material.set_hide_flags(HideFlags::DontSave);
    material.enable_keyword(COMPUTE_BUFFER_KEYWORD);
}

impl<M> MaterialResources<M>
where
    M: Material + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the point material, creating it first if it does not exist yet.
    ///
    /// If a custom material is given and there is no point material yet, the custom material
    /// is used instead of creating a new one.
    pub fn ensure_point_material<B>(
        &mut self,
        backend: &mut B,
        shader: &B::Shader,
        custom: Option<&M>,
    ) -> RendererResult<&mut M>
    where
        B: RenderBackend<Material = M>,
    {
        let slot = match self.point.take() {
            Some(slot) => slot,
            None => match custom {
                Some(custom) => {
                    debug!("Using custom point material.");
                    let mut material = custom.clone();
                    prepare(&mut material);
                    MaterialSlot::Borrowed(material)
                }
                None => {
                    let mut material = backend.create_material(shader)?;
                    debug!("Created point material ({}).", backend.name());
                    prepare(&mut material);
                    MaterialSlot::Owned(material)
                }
            },
        };
        Ok(self.point.insert(slot).material_mut())
    }

    /// Returns the disk material, creating it first if it does not exist yet.
    pub fn ensure_disk_material<B>(
        &mut self,
        backend: &mut B,
        shader: &B::Shader,
    ) -> RendererResult<&mut M>
    where
        B: RenderBackend<Material = M>,
    {
        let material = match self.disk.take() {
            Some(material) => material,
            None => {
                let mut material = backend.create_material(shader)?;
                debug!("Created disk material ({}).", backend.name());
                prepare(&mut material);
                material
            }
        };
        Ok(self.disk.insert(material))
    }

    /// Re-applies the custom material after the configuration has been edited.
    ///
    /// With a custom material, it replaces the current point material. A point material, that
    /// was created by the renderer, is destroyed in the process.
    /// Without a custom material, a previously used custom material is dropped (but not
    /// destroyed), so that the next frame creates a point material of its own.
    pub fn revalidate<D>(&mut self, custom: Option<&M>, destroyer: &mut D)
    where
        D: MaterialDestroyer<M> + ?Sized,
    {
        match custom {
            Some(custom) => {
                let mut material = custom.clone();
                prepare(&mut material);
                let previous = self.point.replace(MaterialSlot::Borrowed(material));
                if let Some(MaterialSlot::Owned(displaced)) = previous {
                    debug!("Point material replaced by custom material.");
                    destroyer.destroy(displaced);
                }
            }
            None => {
                if self.point.as_ref().is_some_and(MaterialSlot::is_borrowed) {
                    debug!("Custom point material removed.");
                    self.point = None;
                }
            }
        }
    }

    /// Destroys all materials owned by the renderer.
    ///
    /// The custom material is never destroyed. Calling this when no material has been created
    /// yet does nothing.
    pub fn release<D>(&mut self, destroyer: &mut D)
    where
        D: MaterialDestroyer<M> + ?Sized,
    {
        match self.point.take() {
            Some(MaterialSlot::Owned(material)) => {
                debug!("Destroying point material.");
                destroyer.destroy(material);
            }
            Some(MaterialSlot::Borrowed(_)) | None => {}
        }
        if let Some(material) = self.disk.take() {
            debug!("Destroying disk material.");
            destroyer.destroy(material);
        }
    }
}

impl<M> MaterialResources<M> {
    pub fn point_slot(&self) -> Option<&MaterialSlot<M>> {
        self.point.as_ref()
    }

    pub fn point_material(&self) -> Option<&M> {
        self.point.as_ref().map(MaterialSlot::material)
    }

    pub fn disk_material(&self) -> Option<&M> {
        self.disk.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::{COMPUTE_BUFFER_KEYWORD, HideFlags, Material, MaterialResources, MaterialSlot};
    use crate::renderer::test_utils::{MockBackend, MockShader, RecordingDestroyer};

    #[test]
    fn ensure_is_idempotent() {
        let mut backend = MockBackend::new();
        let mut resources = MaterialResources::new();

        let first = resources
            .ensure_point_material(&mut backend, &MockShader::Point, None)
            .unwrap()
            .id();
        let second = resources
            .ensure_point_material(&mut backend, &MockShader::Point, None)
            .unwrap()
            .id();
        assert_eq!(first, second);
        assert_eq!(backend.created(MockShader::Point), 1);

        let disk_first = resources
            .ensure_disk_material(&mut backend, &MockShader::Disk)
            .unwrap()
            .id();
        let disk_second = resources
            .ensure_disk_material(&mut backend, &MockShader::Disk)
            .unwrap()
            .id();
        assert_eq!(disk_first, disk_second);
        assert_eq!(backend.created(MockShader::Disk), 1);
    }

    #[test]
    fn new_materials_are_prepared() {
        let mut backend = MockBackend::new();
        let mut resources = MaterialResources::new();
        let point = resources
            .ensure_point_material(&mut backend, &MockShader::Point, None)
            .unwrap();
        assert!(point.is_keyword_enabled(COMPUTE_BUFFER_KEYWORD));
        assert_eq!(point.hide_flags(), HideFlags::DontSave);
        let disk = resources
            .ensure_disk_material(&mut backend, &MockShader::Disk)
            .unwrap();
        assert!(disk.is_keyword_enabled(COMPUTE_BUFFER_KEYWORD));
        assert_eq!(disk.hide_flags(), HideFlags::DontSave);
    }

    #[test]
    fn custom_material_is_used_instead_of_creating_one() {
        let mut backend = MockBackend::new();
        let custom = backend.custom_material();
        let mut resources = MaterialResources::new();
        let point = resources
            .ensure_point_material(&mut backend, &MockShader::Point, Some(&custom))
            .unwrap();
        assert_eq!(point.id(), custom.id());
        assert_eq!(backend.created(MockShader::Point), 0);
        assert!(custom.is_keyword_enabled(COMPUTE_BUFFER_KEYWORD));
        assert_eq!(custom.hide_flags(), HideFlags::DontSave);
        assert!(matches!(
            resources.point_slot(),
            Some(MaterialSlot::Borrowed(_))
        ));
    }

    #[test]
    fn release_destroys_owned_materials() {
        let mut backend = MockBackend::new();
        let mut resources = MaterialResources::new();
        let point = resources
            .ensure_point_material(&mut backend, &MockShader::Point, None)
            .unwrap()
            .clone();
        let disk = resources
            .ensure_disk_material(&mut backend, &MockShader::Disk)
            .unwrap()
            .clone();

        let mut destroyer = RecordingDestroyer::default();
        resources.release(&mut destroyer);
        assert_eq!(destroyer.destroyed_ids(), vec![point.id(), disk.id()]);
        assert!(point.is_destroyed());
        assert!(disk.is_destroyed());
        assert!(resources.point_material().is_none());
        assert!(resources.disk_material().is_none());
    }

    #[test]
    fn release_never_destroys_custom_material() {
        let mut backend = MockBackend::new();
        let custom = backend.custom_material();
        let mut resources = MaterialResources::new();
        resources
            .ensure_point_material(&mut backend, &MockShader::Point, Some(&custom))
            .unwrap();
        let disk = resources
            .ensure_disk_material(&mut backend, &MockShader::Disk)
            .unwrap()
            .clone();

        let mut destroyer = RecordingDestroyer::default();
        resources.release(&mut destroyer);
        assert!(!custom.is_destroyed());
        assert!(disk.is_destroyed());
        assert_eq!(destroyer.destroyed_ids(), vec![disk.id()]);
    }

    #[test]
    fn release_without_materials_is_a_no_op() {
        let mut resources = MaterialResources::<crate::renderer::test_utils::MockMaterial>::new();
        let mut destroyer = RecordingDestroyer::default();
        resources.release(&mut destroyer);
        resources.release(&mut destroyer);
        assert!(destroyer.destroyed_ids().is_empty());
    }

    #[test]
    fn revalidate_replaces_owned_point_material() {
        let mut backend = MockBackend::new();
        let mut resources = MaterialResources::new();
        let owned = resources
            .ensure_point_material(&mut backend, &MockShader::Point, None)
            .unwrap()
            .clone();
        let custom = backend.custom_material();

        let mut destroyer = RecordingDestroyer::default();
        resources.revalidate(Some(&custom), &mut destroyer);

        assert_eq!(resources.point_material().map(|m| m.id()), Some(custom.id()));
        assert!(custom.is_keyword_enabled(COMPUTE_BUFFER_KEYWORD));
        assert_eq!(custom.hide_flags(), HideFlags::DontSave);
        assert!(owned.is_destroyed());
        assert_eq!(destroyer.destroyed_ids(), vec![owned.id()]);
    }

    #[test]
    fn revalidate_before_first_frame_installs_custom_material() {
        let mut backend = MockBackend::new();
        let custom = backend.custom_material();
        let mut resources = MaterialResources::new();
        let mut destroyer = RecordingDestroyer::default();
        resources.revalidate(Some(&custom), &mut destroyer);
        assert_eq!(resources.point_material().map(|m| m.id()), Some(custom.id()));
        assert!(destroyer.destroyed_ids().is_empty());

        let point = resources
            .ensure_point_material(&mut backend, &MockShader::Point, Some(&custom))
            .unwrap();
        assert_eq!(point.id(), custom.id());
        assert_eq!(backend.created(MockShader::Point), 0);
    }

    #[test]
    fn removing_custom_material_drops_it_without_destroying() {
        let mut backend = MockBackend::new();
        let custom = backend.custom_material();
        let mut resources = MaterialResources::new();
        let mut destroyer = RecordingDestroyer::default();
        resources.revalidate(Some(&custom), &mut destroyer);
        resources.revalidate(None, &mut destroyer);

        assert!(resources.point_material().is_none());
        assert!(!custom.is_destroyed());
        assert!(destroyer.destroyed_ids().is_empty());

        let point = resources
            .ensure_point_material(&mut backend, &MockShader::Point, None)
            .unwrap();
        assert_ne!(point.id(), custom.id());
        assert_eq!(backend.created(MockShader::Point), 1);
    }

    #[test]
    fn revalidate_without_custom_keeps_owned_material() {
        let mut backend = MockBackend::new();
        let mut resources = MaterialResources::new();
        let owned = resources
            .ensure_point_material(&mut backend, &MockShader::Point, None)
            .unwrap()
            .id();
        let mut destroyer = RecordingDestroyer::default();
        resources.revalidate(None, &mut destroyer);
        assert_eq!(resources.point_material().map(|m| m.id()), Some(owned));
        assert!(destroyer.destroyed_ids().is_empty());
    }
}
