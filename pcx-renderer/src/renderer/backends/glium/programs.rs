//! Functionality for managing the shader programs of the materials.
//!
//! Each shader can be compiled in multiple variants, depending on the keywords enabled in the
//! material. A keyword is passed to the shader source as a `#define`, that is inserted right after
//! the `#version` directive.
//!
//! To avoid unnecessary shader compilations, there is the [ProgramManager], that keeps track of the
//! shader programs, that have been built before, so existing programs can be reused if possible.

use crate::renderer::error::{RendererError, RendererResult};
use glium::program::ProgramCreationInput;
use glium::{Display, Program, ProgramCreationError};
use log::debug;
use std::collections::{BTreeSet, HashMap};
use std::rc::{Rc, Weak};

/// Source code of a shader, that materials can be created from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct GliumShader {
    pub name: &'static str,
    pub vertex: &'static str,
    pub geometry: Option<&'static str>,
    pub fragment: &'static str,
}

impl GliumShader {
    /// Draws every point as a single pixel.
    pub fn point() -> Self {
        GliumShader {
            name: "Point Cloud/Point",
            vertex: include_str!("shaders/point.vert"),
            geometry: None,
            fragment: include_str!("shaders/point.frag"),
        }
    }

    /// Draws every point as a disk facing the camera.
    pub fn disk() -> Self {
        GliumShader {
            name: "Point Cloud/Disk",
            vertex: include_str!("shaders/disk.vert"),
            geometry: Some(include_str!("shaders/disk.geom")),
            fragment: include_str!("shaders/disk.frag"),
        }
    }
}

/// Identifies one variant of a shader.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ProgramKey {
    pub shader: GliumShader,
    pub keywords: BTreeSet<&'static str>,
}

/// Manages the shader programs, that are currently in use.
pub struct ProgramManager {
    programs: HashMap<ProgramKey, Weak<Program>>,
}

impl ProgramManager {
    pub fn new() -> Self {
        ProgramManager {
            programs: HashMap::new(),
        }
    }

    pub fn get_or_create(
        &mut self,
        display: &Display,
        key: &ProgramKey,
    ) -> RendererResult<Rc<Program>> {
        // look for existing entry in cache
        if let Some(weak) = self.programs.get(key) {
            if let Some(program) = weak.upgrade() {
                debug!("Reusing existing shader: {} {:?}", key.shader.name, key.keywords);
                return Ok(program);
            }
        }

        // create program
        debug!("Assembling shader: {} {:?}", key.shader.name, key.keywords);
        let program = Rc::new(build_program(display, key).map_err(RendererError::graphics)?);

        // store in cache, forget about programs that are no longer used by any material
        self.programs.retain(|_, weak| weak.strong_count() > 0);
        self.programs.insert(key.clone(), Rc::downgrade(&program));
        Ok(program)
    }
}

impl Default for ProgramManager {
    fn default() -> Self {
        Self::new()
    }
}

fn build_program(display: &Display, key: &ProgramKey) -> Result<Program, ProgramCreationError> {
    let vertex_shader = assemble_source(key.shader.vertex, &key.keywords);
    let geometry_shader = key
        .shader
        .geometry
        .map(|source| assemble_source(source, &key.keywords));
    let fragment_shader = assemble_source(key.shader.fragment, &key.keywords);

    debug!("Vertex shader source: \n{}", vertex_shader);
    if let Some(geometry_shader) = &geometry_shader {
        debug!("Geometry shader source: \n{}", geometry_shader);
    }
    debug!("Fragment shader source: \n{}", fragment_shader);

    Program::new(
        display,
        ProgramCreationInput::SourceCode {
            vertex_shader: &vertex_shader,
            tessellation_control_shader: None,
            tessellation_evaluation_shader: None,
            geometry_shader: geometry_shader.as_deref(),
            fragment_shader: &fragment_shader,
            transform_feedback_varyings: None,
            outputs_srgb: false,
            uses_point_size: true,
        },
    )
}

/// Inserts a `#define` for each keyword into the shader source.
///
/// GLSL requires `#version` to be the first directive, so the defines go into the line after it.
/// Sources without a `#version` directive get the defines prepended.
pub fn assemble_source(source: &str, keywords: &BTreeSet<&'static str>) -> String {
    let defines: String = keywords
        .iter()
        .map(|keyword| format!("#define {}\n", keyword))
        .collect();

    let version_line_end = source
        .lines()
        .next()
        .filter(|line| line.trim_start().starts_with("#version"))
        .map(|line| line.len());

    match version_line_end {
        Some(len) => {
            let (version, rest) = source.split_at(len);
            let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'));
            format!("{}\n{}{}", version, defines, rest.unwrap_or(""))
        }
        None => format!("{}{}", defines, source),
    }
}
