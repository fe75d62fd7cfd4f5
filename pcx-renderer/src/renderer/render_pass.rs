//! The per-frame render pass of a point cloud.
//!
//! Every frame, the [PointCloudRenderer] decides, whether the point cloud is visible to the
//! current camera. If it is, it binds the point buffer and the render settings to the material
//! of the selected [ShadingStrategy] and returns a [DrawCommand], that the backend submits.
//!
//! Frames, in which there is nothing to draw, are skipped silently.

use crate::renderer::backends::RenderBackend;
use crate::renderer::camera::{Camera, Layer};
use crate::renderer::error::RendererResult;
use crate::renderer::material::{Material, MaterialDestroyer, MaterialResources};
use crate::renderer::point_data::{PointBuffer, PointCloudData};
use crate::renderer::settings::{Color, PointCloudRenderSettings};
use crate::renderer::strategy::{ShadingStrategy, select_strategy};
use pasture_core::nalgebra::Matrix4;

pub const TINT_PROPERTY: &str = "_Tint";
pub const TRANSFORM_PROPERTY: &str = "_Transform";
pub const POINT_BUFFER_PROPERTY: &str = "_PointBuffer";
pub const POINT_SIZE_PROPERTY: &str = "_PointSize";

/// Primitive type of a draw call.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Topology {
    Points,
}

/// A non-indexed, procedural draw call.
///
/// The vertices are not taken from a vertex buffer. The shader fetches vertex `i` from the point
/// buffer, that is bound to the material.
#[derive(Debug)]
pub struct DrawCommand<'a, M> {
    pub strategy: ShadingStrategy,
    pub material: &'a M,
    pub pass: usize,
    pub topology: Topology,
    pub vertex_count: usize,
    pub instance_count: usize,
}

/// Reasons for skipping a frame.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum SkipReason {
    /// Neither a point buffer nor source data is assigned.
    MissingResource,

    /// There is no current camera.
    NoCamera,

    /// The camera does not render the layer of the point cloud.
    LayerCulled,

    /// The camera renders material or asset previews.
    PreviewCamera,
}

/// Renders a single point cloud.
pub struct PointCloudRenderer<B: RenderBackend> {
    source_data: Option<PointCloudData<B::Buffer>>,
    source_buffer: Option<B::Buffer>,
    settings: PointCloudRenderSettings,
    layer: Layer,
    point_shader: B::Shader,
    disk_shader: B::Shader,
    custom_point_material: Option<B::Material>,
    materials: MaterialResources<B::Material>,
}

impl<B: RenderBackend> PointCloudRenderer<B> {
    /// Creates a renderer with default settings, that does not draw anything until a point
    /// buffer or source data is assigned.
    pub fn new(point_shader: B::Shader, disk_shader: B::Shader) -> Self {
        PointCloudRenderer {
            source_data: None,
            source_buffer: None,
            settings: PointCloudRenderSettings::default(),
            layer: Layer::DEFAULT,
            point_shader,
            disk_shader,
            custom_point_material: None,
            materials: MaterialResources::new(),
        }
    }

    pub fn with_settings(mut self, settings: PointCloudRenderSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn source_data(&self) -> Option<&PointCloudData<B::Buffer>> {
        self.source_data.as_ref()
    }

    pub fn set_source_data(&mut self, source_data: Option<PointCloudData<B::Buffer>>) {
        self.source_data = source_data;
    }

    pub fn source_buffer(&self) -> Option<&B::Buffer> {
        self.source_buffer.as_ref()
    }

    /// Assigns a point buffer directly, bypassing the source data.
    /// While it is set, it takes precedence over the buffer of the source data.
    pub fn set_source_buffer(&mut self, buffer: Option<B::Buffer>) {
        self.source_buffer = buffer;
    }

    pub fn settings(&self) -> &PointCloudRenderSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut PointCloudRenderSettings {
        &mut self.settings
    }

    pub fn set_settings(&mut self, settings: PointCloudRenderSettings) {
        self.settings = settings;
    }

    pub fn set_point_tint(&mut self, tint: Color) {
        self.settings.point_tint = tint;
    }

    pub fn set_point_size(&mut self, point_size: f32) {
        self.settings.point_size = point_size;
    }

    pub fn set_force_point_shader(&mut self, force: bool) {
        self.settings.force_point_shader = force;
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn set_layer(&mut self, layer: Layer) {
        self.layer = layer;
    }

    /// Replaces the point shader.
    /// Materials, that already exist, keep using the shader they were created with.
    pub fn set_point_shader(&mut self, shader: B::Shader) {
        self.point_shader = shader;
    }

    /// Replaces the disk shader.
    /// Materials, that already exist, keep using the shader they were created with.
    pub fn set_disk_shader(&mut self, shader: B::Shader) {
        self.disk_shader = shader;
    }

    pub fn custom_point_material(&self) -> Option<&B::Material> {
        self.custom_point_material.as_ref()
    }

    /// Sets the material, that is used instead of the point material.
    /// Call [Self::revalidate] afterwards, to apply the change to a renderer, that already drew
    /// some frames.
    pub fn set_custom_point_material(&mut self, material: Option<B::Material>) {
        self.custom_point_material = material;
    }

    pub fn materials(&self) -> &MaterialResources<B::Material> {
        &self.materials
    }

    /// Applies configuration changes to the materials.
    /// To be called by the host between frames, after every edit of the configuration.
    pub fn revalidate<D>(&mut self, destroyer: &mut D)
    where
        D: MaterialDestroyer<B::Material> + ?Sized,
    {
        self.materials.revalidate(self.custom_point_material.as_ref(), destroyer);
    }

    /// Destroys the materials created by this renderer. The custom material is left alone.
    pub fn release<D>(&mut self, destroyer: &mut D)
    where
        D: MaterialDestroyer<B::Material> + ?Sized,
    {
        self.materials.release(destroyer);
    }

    /// The point buffer to draw: The directly assigned buffer, if there is one, otherwise the
    /// buffer of the source data.
    pub fn active_buffer(&self) -> Option<&B::Buffer> {
        self.source_buffer
            .as_ref()
            .or_else(|| self.source_data.as_ref().map(PointCloudData::compute_buffer))
    }

    /// Decides, whether the current frame has to be drawn, and returns the point buffer to draw.
    pub(crate) fn gate(&self, camera: Option<&Camera>) -> Result<&B::Buffer, SkipReason> {
        let buffer = self.active_buffer().ok_or(SkipReason::MissingResource)?;
        let camera = camera.ok_or(SkipReason::NoCamera)?;
        if !camera.renders_layer(self.layer) {
            return Err(SkipReason::LayerCulled);
        }
        if camera.is_preview() {
            return Err(SkipReason::PreviewCamera);
        }
        Ok(buffer)
    }

    /// Prepares the draw call for the current frame.
    ///
    /// Returns `Ok(None)`, if the point cloud is not drawn for the given camera. In that case,
    /// no material is created or modified.
    /// Otherwise, both materials are created (if they do not exist yet), the settings, the
    /// transform and the point buffer are bound to the material of the selected shading
    /// strategy, and the draw command is returned.
    pub fn render_frame(
        &mut self,
        backend: &mut B,
        camera: Option<&Camera>,
        transform: &Matrix4<f64>,
    ) -> RendererResult<Option<DrawCommand<'_, B::Material>>> {
        let buffer = match self.gate(camera) {
            Ok(buffer) => buffer.clone(),
            Err(_) => return Ok(None),
        };

        let strategy = select_strategy(self.settings.point_size, self.settings.force_point_shader);

        let custom = self.custom_point_material.as_ref();
        self.materials.ensure_point_material(backend, &self.point_shader, custom)?;
        self.materials.ensure_disk_material(backend, &self.disk_shader)?;

        let material = match strategy {
            ShadingStrategy::Point => {
                self.materials.ensure_point_material(backend, &self.point_shader, custom)?
            }
            ShadingStrategy::Disk => {
                self.materials.ensure_disk_material(backend, &self.disk_shader)?
            }
        };
        material.set_color(TINT_PROPERTY, self.settings.point_tint);
        material.set_matrix(TRANSFORM_PROPERTY, transform);
        material.set_buffer(POINT_BUFFER_PROPERTY, &buffer);
        material.set_float(POINT_SIZE_PROPERTY, self.settings.point_size);

        Ok(Some(DrawCommand {
            strategy,
            material,
            pass: 0,
            topology: Topology::Points,
            vertex_count: buffer.len(),
            instance_count: 1,
        }))
    }
}
