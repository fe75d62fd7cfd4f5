//! A render backend, that records what is done with it, for testing without a GPU.

use crate::renderer::backends::RenderBackend;
use crate::renderer::error::{RendererError, RendererResult};
use crate::renderer::material::{HideFlags, Material, MaterialDestroyer};
use crate::renderer::point_data::{PointBuffer, PointRecord};
use crate::renderer::settings::Color;
use pasture_core::nalgebra::Matrix4;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MockShader {
    Point,
    Disk,
    Custom,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MockBuffer {
    pub id: usize,
    pub len: usize,
}

impl MockBuffer {
    pub fn new(id: usize, len: usize) -> Self {
        MockBuffer { id, len }
    }
}

impl PointBuffer for MockBuffer {
    fn len(&self) -> usize {
        self.len
    }
}

#[derive(Debug, Default)]
pub struct MockMaterialState {
    pub keywords: BTreeSet<&'static str>,
    pub hide_flags: HideFlags,
    pub colors: HashMap<&'static str, Color>,
    pub matrices: HashMap<&'static str, Matrix4<f64>>,
    pub buffers: HashMap<&'static str, MockBuffer>,
    pub floats: HashMap<&'static str, f32>,
    pub destroyed: bool,
}

/// Material handle. Clones share their state.
#[derive(Clone, Debug)]
pub struct MockMaterial {
    id: usize,
    shader: MockShader,
    state: Rc<RefCell<MockMaterialState>>,
}

impl MockMaterial {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn shader(&self) -> MockShader {
        self.shader
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.borrow().destroyed
    }

    pub fn color(&self, name: &str) -> Option<Color> {
        self.state.borrow().colors.get(name).copied()
    }

    pub fn matrix(&self, name: &str) -> Option<Matrix4<f64>> {
        self.state.borrow().matrices.get(name).copied()
    }

    pub fn buffer(&self, name: &str) -> Option<MockBuffer> {
        self.state.borrow().buffers.get(name).cloned()
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        self.state.borrow().floats.get(name).copied()
    }

    /// True, if no uniform has been set on this material so far.
    pub fn is_untouched(&self) -> bool {
        let state = self.state.borrow();
        state.colors.is_empty()
            && state.matrices.is_empty()
            && state.buffers.is_empty()
            && state.floats.is_empty()
    }
}

impl Material for MockMaterial {
    type Buffer = MockBuffer;

    fn enable_keyword(&mut self, keyword: &'static str) {
        self.state.borrow_mut().keywords.insert(keyword);
    }

    fn is_keyword_enabled(&self, keyword: &str) -> bool {
        self.state.borrow().keywords.contains(keyword)
    }

    fn set_hide_flags(&mut self, flags: HideFlags) {
        self.state.borrow_mut().hide_flags = flags;
    }

    fn hide_flags(&self) -> HideFlags {
        self.state.borrow().hide_flags
    }

    fn set_color(&mut self, name: &'static str, color: Color) {
        self.state.borrow_mut().colors.insert(name, color);
    }

    fn set_matrix(&mut self, name: &'static str, matrix: &Matrix4<f64>) {
        self.state.borrow_mut().matrices.insert(name, *matrix);
    }

    fn set_buffer(&mut self, name: &'static str, buffer: &MockBuffer) {
        self.state.borrow_mut().buffers.insert(name, buffer.clone());
    }

    fn set_float(&mut self, name: &'static str, value: f32) {
        self.state.borrow_mut().floats.insert(name, value);
    }
}

#[derive(Debug, Default)]
pub struct MockBackend {
    next_id: usize,
    created: HashMap<MockShader, usize>,
    fail_material_creation: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following material creation fail, like a shader that does not compile.
    pub fn fail_material_creation(&mut self) {
        self.fail_material_creation = true;
    }

    /// Number of materials created for the given shader through [RenderBackend::create_material].
    pub fn created(&self, shader: MockShader) -> usize {
        self.created.get(&shader).copied().unwrap_or(0)
    }

    pub fn total_created(&self) -> usize {
        self.created.values().sum()
    }

    /// A material created outside of the renderer, as a user would supply it.
    pub fn custom_material(&mut self) -> MockMaterial {
        self.new_material(MockShader::Custom)
    }

    fn new_material(&mut self, shader: MockShader) -> MockMaterial {
        self.next_id += 1;
        MockMaterial {
            id: self.next_id,
            shader,
            state: Rc::new(RefCell::new(MockMaterialState::default())),
        }
    }
}

impl RenderBackend for MockBackend {
    type Shader = MockShader;
    type Buffer = MockBuffer;
    type Material = MockMaterial;

    fn name(&self) -> &'static str {
        "Mock"
    }

    fn create_material(&mut self, shader: &MockShader) -> RendererResult<MockMaterial> {
        if self.fail_material_creation {
            return Err(RendererError::UnsupportedOperation {
                backend_name: self.name(),
                operation_name: format!("create material for {:?}", shader),
                platform_specific: false,
            });
        }
        *self.created.entry(*shader).or_insert(0) += 1;
        Ok(self.new_material(*shader))
    }

    fn create_point_buffer(&mut self, points: &[PointRecord]) -> RendererResult<MockBuffer> {
        self.next_id += 1;
        Ok(MockBuffer::new(self.next_id, points.len()))
    }
}

/// Destroys materials immediately and remembers, which ones it destroyed.
#[derive(Debug, Default)]
pub struct RecordingDestroyer {
    destroyed: Vec<MockMaterial>,
}

impl RecordingDestroyer {
    pub fn destroyed_ids(&self) -> Vec<usize> {
        self.destroyed.iter().map(MockMaterial::id).collect()
    }
}

impl MaterialDestroyer<MockMaterial> for RecordingDestroyer {
    fn destroy(&mut self, material: MockMaterial) {
        material.state.borrow_mut().destroyed = true;
        self.destroyed.push(material);
    }
}
