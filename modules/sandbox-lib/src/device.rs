//! Graphics driver abstraction.
//!
//! Every component in this crate talks to the driver through a [`Device`].
//! The GL backend forwards each method to the matching OpenGL entry point,
//! and the headless backend fakes them in memory so the crate can be tested
//! without a GL context.
use crate::{layout::VertexBufferElement, Result};
use std::fmt;

/// Driver name of a shader object. `0` is the null shader.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ShaderId(pub u32);

/// Driver name of a program object. `0` is the null program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgramId(pub u32);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferId(pub u32);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VertexArrayId(pub u32);

/// Shader pipeline stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Vertex => write!(f, "vertex"),
            Stage::Fragment => write!(f, "fragment"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute data.
    Array,
    /// Vertex indices.
    ElementArray,
}

pub trait Device {
    // shader objects
    fn create_shader(&self, stage: Stage) -> Result<ShaderId>;
    fn shader_source(&self, shader: ShaderId, source: &str) -> Result<()>;
    fn compile_shader(&self, shader: ShaderId) -> Result<()>;
    fn compile_status(&self, shader: ShaderId) -> Result<bool>;
    fn shader_info_log(&self, shader: ShaderId) -> Result<String>;
    fn delete_shader(&self, shader: ShaderId) -> Result<()>;

    // program objects
    fn create_program(&self) -> Result<ProgramId>;
    fn attach_shader(&self, program: ProgramId, shader: ShaderId) -> Result<()>;
    fn link_program(&self, program: ProgramId) -> Result<()>;
    fn link_status(&self, program: ProgramId) -> Result<bool>;
    fn program_info_log(&self, program: ProgramId) -> Result<String>;
    fn validate_program(&self, program: ProgramId) -> Result<()>;
    /// Make `program` current, or unbind any program when `None`.
    fn use_program(&self, program: Option<ProgramId>) -> Result<()>;
    fn delete_program(&self, program: ProgramId) -> Result<()>;

    // uniforms
    /// Returns `-1` when `name` is not an active uniform of `program`.
    fn uniform_location(&self, program: ProgramId, name: &str) -> Result<i32>;
    fn uniform_1i(&self, location: i32, value: i32) -> Result<()>;
    fn uniform_1f(&self, location: i32, value: f32) -> Result<()>;
    fn uniform_4f(&self, location: i32, value: [f32; 4]) -> Result<()>;
    /// Column-major 4x4 matrix.
    fn uniform_mat4(&self, location: i32, value: &[f32; 16]) -> Result<()>;

    // buffers
    fn create_buffer(&self, target: BufferTarget, data: &[u8]) -> Result<BufferId>;
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferId>) -> Result<()>;
    fn delete_buffer(&self, buffer: BufferId) -> Result<()>;

    // vertex arrays
    fn create_vertex_array(&self) -> Result<VertexArrayId>;
    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayId>) -> Result<()>;
    fn delete_vertex_array(&self, vertex_array: VertexArrayId) -> Result<()>;
    /// Enable attribute `index` and describe where it lives in the bound
    /// array buffer.
    fn vertex_attrib(
        &self,
        index: u32,
        element: &VertexBufferElement,
        stride: u32,
        offset: usize,
    ) -> Result<()>;

    // frame
    fn viewport(&self, width: u32, height: u32) -> Result<()>;
    fn clear_color(&self, color: [f32; 4]) -> Result<()>;
    fn clear(&self) -> Result<()>;
    /// Draw `count` `u32` indices from the bound element buffer as triangles.
    fn draw_elements(&self, count: u32) -> Result<()>;
}
