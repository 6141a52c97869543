use gl::types::*;
use sandbox_lib::{
    device::{BufferId, BufferTarget, Device, ProgramId, ShaderId, Stage, VertexArrayId},
    layout::{ElementType, VertexBufferElement},
    Result,
};
use std::{ffi::CString, marker::PhantomData, os::raw::c_void, ptr};

/// Device backed by the current OpenGL context.
///
/// GL contexts are bound to the thread that made them current, so this type
/// is neither `Send` nor `Sync`.
pub struct GlDevice {
    _context: PhantomData<*const ()>,
}

impl GlDevice {
    /// Load the GL function pointers through `loader`. The context they
    /// belong to must be current on this thread.
    pub fn load_with<F>(loader: F) -> Self
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        Self {
            _context: PhantomData,
        }
    }
}

fn stage(stage: Stage) -> GLenum {
    match stage {
        Stage::Vertex => gl::VERTEX_SHADER,
        Stage::Fragment => gl::FRAGMENT_SHADER,
    }
}

fn target(target: BufferTarget) -> GLenum {
    match target {
        BufferTarget::Array => gl::ARRAY_BUFFER,
        BufferTarget::ElementArray => gl::ELEMENT_ARRAY_BUFFER,
    }
}

fn element_type(ty: ElementType) -> GLenum {
    match ty {
        ElementType::Float => gl::FLOAT,
        ElementType::UnsignedInt => gl::UNSIGNED_INT,
        ElementType::UnsignedByte => gl::UNSIGNED_BYTE,
    }
}

fn boolean(value: bool) -> GLboolean {
    if value {
        gl::TRUE
    } else {
        gl::FALSE
    }
}

/// Trim a driver info log to the bytes actually written.
fn info_log(mut buffer: Vec<u8>, written: GLsizei) -> String {
    buffer.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&buffer).into_owned()
}

impl Device for GlDevice {
    fn create_shader(&self, stage: Stage) -> Result<ShaderId> {
        gl_call!(gl::CreateShader(self::stage(stage))).map(ShaderId)
    }

    fn shader_source(&self, shader: ShaderId, source: &str) -> Result<()> {
        let len = source.len() as GLint;
        gl_call!(gl::ShaderSource(
            shader.0,
            1,
            [source.as_ptr() as *const GLchar].as_ptr(),
            [len].as_ptr()
        ))
    }

    fn compile_shader(&self, shader: ShaderId) -> Result<()> {
        gl_call!(gl::CompileShader(shader.0))
    }

    fn compile_status(&self, shader: ShaderId) -> Result<bool> {
        let mut status = GLint::from(gl::FALSE);
        gl_call!(gl::GetShaderiv(shader.0, gl::COMPILE_STATUS, &mut status))?;
        Ok(status != GLint::from(gl::FALSE))
    }

    fn shader_info_log(&self, shader: ShaderId) -> Result<String> {
        let mut len: GLint = 0;
        gl_call!(gl::GetShaderiv(shader.0, gl::INFO_LOG_LENGTH, &mut len))?;
        let mut buffer = vec![0u8; len.max(0) as usize];
        let mut written: GLsizei = 0;
        gl_call!(gl::GetShaderInfoLog(
            shader.0,
            len,
            &mut written,
            buffer.as_mut_ptr() as *mut GLchar
        ))?;
        Ok(info_log(buffer, written))
    }

    fn delete_shader(&self, shader: ShaderId) -> Result<()> {
        gl_call!(gl::DeleteShader(shader.0))
    }

    fn create_program(&self) -> Result<ProgramId> {
        gl_call!(gl::CreateProgram()).map(ProgramId)
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) -> Result<()> {
        gl_call!(gl::AttachShader(program.0, shader.0))
    }

    fn link_program(&self, program: ProgramId) -> Result<()> {
        gl_call!(gl::LinkProgram(program.0))
    }

    fn link_status(&self, program: ProgramId) -> Result<bool> {
        let mut status = GLint::from(gl::FALSE);
        gl_call!(gl::GetProgramiv(program.0, gl::LINK_STATUS, &mut status))?;
        Ok(status != GLint::from(gl::FALSE))
    }

    fn program_info_log(&self, program: ProgramId) -> Result<String> {
        let mut len: GLint = 0;
        gl_call!(gl::GetProgramiv(program.0, gl::INFO_LOG_LENGTH, &mut len))?;
        let mut buffer = vec![0u8; len.max(0) as usize];
        let mut written: GLsizei = 0;
        gl_call!(gl::GetProgramInfoLog(
            program.0,
            len,
            &mut written,
            buffer.as_mut_ptr() as *mut GLchar
        ))?;
        Ok(info_log(buffer, written))
    }

    fn validate_program(&self, program: ProgramId) -> Result<()> {
        gl_call!(gl::ValidateProgram(program.0))
    }

    fn use_program(&self, program: Option<ProgramId>) -> Result<()> {
        gl_call!(gl::UseProgram(program.map(|p| p.0).unwrap_or(0)))
    }

    fn delete_program(&self, program: ProgramId) -> Result<()> {
        gl_call!(gl::DeleteProgram(program.0))
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Result<i32> {
        let name = match CString::new(name) {
            Ok(name) => name,
            // can't name a uniform in GLSL
            Err(_) => return Ok(-1),
        };
        gl_call!(gl::GetUniformLocation(program.0, name.as_ptr()))
    }

    fn uniform_1i(&self, location: i32, value: i32) -> Result<()> {
        gl_call!(gl::Uniform1i(location, value))
    }

    fn uniform_1f(&self, location: i32, value: f32) -> Result<()> {
        gl_call!(gl::Uniform1f(location, value))
    }

    fn uniform_4f(&self, location: i32, [v0, v1, v2, v3]: [f32; 4]) -> Result<()> {
        gl_call!(gl::Uniform4f(location, v0, v1, v2, v3))
    }

    fn uniform_mat4(&self, location: i32, value: &[f32; 16]) -> Result<()> {
        gl_call!(gl::UniformMatrix4fv(location, 1, gl::FALSE, value.as_ptr()))
    }

    fn create_buffer(&self, target: BufferTarget, data: &[u8]) -> Result<BufferId> {
        let target = self::target(target);
        let mut buffer = 0;
        gl_call!(gl::GenBuffers(1, &mut buffer))?;
        gl_call!(gl::BindBuffer(target, buffer))?;
        gl_call!(gl::BufferData(
            target,
            data.len() as GLsizeiptr,
            data.as_ptr() as *const c_void,
            gl::STATIC_DRAW
        ))?;
        Ok(BufferId(buffer))
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferId>) -> Result<()> {
        gl_call!(gl::BindBuffer(
            self::target(target),
            buffer.map(|b| b.0).unwrap_or(0)
        ))
    }

    fn delete_buffer(&self, buffer: BufferId) -> Result<()> {
        gl_call!(gl::DeleteBuffers(1, &buffer.0))
    }

    fn create_vertex_array(&self) -> Result<VertexArrayId> {
        let mut vertex_array = 0;
        gl_call!(gl::GenVertexArrays(1, &mut vertex_array))?;
        Ok(VertexArrayId(vertex_array))
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayId>) -> Result<()> {
        gl_call!(gl::BindVertexArray(vertex_array.map(|v| v.0).unwrap_or(0)))
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayId) -> Result<()> {
        gl_call!(gl::DeleteVertexArrays(1, &vertex_array.0))
    }

    fn vertex_attrib(
        &self,
        index: u32,
        element: &VertexBufferElement,
        stride: u32,
        offset: usize,
    ) -> Result<()> {
        gl_call!(gl::EnableVertexAttribArray(index))?;
        gl_call!(gl::VertexAttribPointer(
            index,
            element.count as GLint,
            element_type(element.ty),
            boolean(element.normalized),
            stride as GLsizei,
            offset as *const c_void
        ))
    }

    fn viewport(&self, width: u32, height: u32) -> Result<()> {
        gl_call!(gl::Viewport(0, 0, width as GLsizei, height as GLsizei))
    }

    fn clear_color(&self, [r, g, b, a]: [f32; 4]) -> Result<()> {
        gl_call!(gl::ClearColor(r, g, b, a))
    }

    fn clear(&self) -> Result<()> {
        gl_call!(gl::Clear(gl::COLOR_BUFFER_BIT))
    }

    fn draw_elements(&self, count: u32) -> Result<()> {
        gl_call!(gl::DrawElements(
            gl::TRIANGLES,
            count as GLsizei,
            gl::UNSIGNED_INT,
            ptr::null()
        ))
    }
}
