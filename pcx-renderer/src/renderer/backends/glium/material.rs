use crate::renderer::backends::glium::dynamic_drawing::DynamicUniforms;
use crate::renderer::backends::glium::point_buffer::GliumPointBuffer;
use crate::renderer::backends::glium::programs::{GliumShader, ProgramKey, ProgramManager};
use crate::renderer::backends::glium::util::matrix_to_gl;
use crate::renderer::error::{RendererError, RendererResult};
use crate::renderer::material::{HideFlags, Material};
use crate::renderer::settings::Color;
use glium::uniforms::UniformValue;
use glium::{Display, Program};
use pasture_core::nalgebra::Matrix4;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// A uniform value stored in a material.
#[derive(Clone, Debug)]
pub enum MaterialValue {
    Color([f32; 4]),
    Matrix([[f32; 4]; 4]),
    Float(f32),
    Buffer(GliumPointBuffer),
}

impl MaterialValue {
    fn as_uniform_value(&self) -> UniformValue<'_> {
        match self {
            MaterialValue::Color(c) => UniformValue::Vec4(*c),
            MaterialValue::Matrix(m) => UniformValue::Mat4(*m),
            MaterialValue::Float(f) => UniformValue::Float(*f),
            MaterialValue::Buffer(b) => b.as_uniform_value(),
        }
    }
}

struct MaterialState {
    shader: GliumShader,
    keywords: BTreeSet<&'static str>,
    hide_flags: HideFlags,
    values: Vec<(&'static str, MaterialValue)>,
    program: Option<Rc<Program>>,
    destroyed: bool,
}

/// Material of the glium backend.
///
/// The shader program is compiled lazily, when the material is drawn for the first time after
/// its keywords changed.
#[derive(Clone)]
pub struct GliumMaterial {
    state: Rc<RefCell<MaterialState>>,
}

impl GliumMaterial {
    pub fn new(shader: GliumShader) -> Self {
        GliumMaterial {
            state: Rc::new(RefCell::new(MaterialState {
                shader,
                keywords: BTreeSet::new(),
                hide_flags: HideFlags::None,
                values: Vec::new(),
                program: None,
                destroyed: false,
            })),
        }
    }

    pub fn shader_name(&self) -> &'static str {
        self.state.borrow().shader.name
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.borrow().destroyed
    }

    /// True, if both handles refer to the same material.
    pub fn same_material(&self, other: &GliumMaterial) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    pub fn value(&self, name: &str) -> Option<MaterialValue> {
        self.state
            .borrow()
            .values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.clone())
    }

    /// Releases the shader program and all bound values.
    /// The material can not be drawn any more afterwards.
    pub fn destroy_now(&self) {
        let mut state = self.state.borrow_mut();
        state.destroyed = true;
        state.program = None;
        state.values.clear();
    }

    /// Returns the shader program for the enabled keywords, compiling it if necessary.
    pub(super) fn program(
        &self,
        display: &Display,
        programs: &mut ProgramManager,
    ) -> RendererResult<Rc<Program>> {
        let mut state = self.state.borrow_mut();
        if state.destroyed {
            return Err(RendererError::MaterialDestroyed);
        }
        if let Some(program) = &state.program {
            return Ok(Rc::clone(program));
        }
        let key = ProgramKey {
            shader: state.shader,
            keywords: state.keywords.clone(),
        };
        let program = programs.get_or_create(display, &key)?;
        state.program = Some(Rc::clone(&program));
        Ok(program)
    }

    /// Names of the values, that have been set, in the order they were first set.
    pub fn value_names(&self) -> Vec<&'static str> {
        self.state.borrow().values.iter().map(|(n, _)| *n).collect()
    }

    pub fn has_value(&self, name: &str) -> bool {
        self.state.borrow().values.iter().any(|(n, _)| *n == name)
    }

    /// Adds the values of this material to the given uniforms, and passes them to `f`.
    pub(super) fn with_uniforms<F, R>(&self, uniforms: DynamicUniforms<'_>, f: F) -> R
    where
        F: for<'a> FnOnce(&DynamicUniforms<'a>) -> R,
    {
        let state = self.state.borrow();
        let mut uniforms = uniforms;
        for (name, value) in &state.values {
            uniforms.add_uniform_value(*name, value.as_uniform_value());
        }
        f(&uniforms)
    }

    fn set_value(&mut self, name: &'static str, value: MaterialValue) {
        let mut state = self.state.borrow_mut();
        match state.values.iter_mut().find(|(n, _)| *n == name) {
            Some((_, old)) => *old = value,
            None => state.values.push((name, value)),
        }
    }
}

impl Material for GliumMaterial {
    type Buffer = GliumPointBuffer;

    fn enable_keyword(&mut self, keyword: &'static str) {
        let mut state = self.state.borrow_mut();
        if state.keywords.insert(keyword) {
            state.program = None;
        }
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
        self.set_value(name, MaterialValue::Color(color.to_array()));
    }

    fn set_matrix(&mut self, name: &'static str, matrix: &Matrix4<f64>) {
        self.set_value(name, MaterialValue::Matrix(matrix_to_gl(matrix)));
    }

    fn set_buffer(&mut self, name: &'static str, buffer: &GliumPointBuffer) {
        self.set_value(name, MaterialValue::Buffer(buffer.clone()));
    }

    fn set_float(&mut self, name: &'static str, value: f32) {
        self.set_value(name, MaterialValue::Float(value));
    }
}

impl std::fmt::Debug for GliumMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("GliumMaterial")
            .field("shader", &state.shader.name)
            .field("keywords", &state.keywords)
            .field("hide_flags", &state.hide_flags)
            .field("destroyed", &state.destroyed)
            .finish()
    }
}
