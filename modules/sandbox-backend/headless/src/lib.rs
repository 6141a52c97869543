//! In-memory [`Device`] that doesn't need a GL context.
//!
//! Every call is recorded so tests can assert on the exact sequence of driver
//! round-trips. Compilation fails for any source containing the error marker
//! (`#error` by default), and programs only know about the uniforms
//! registered with [`HeadlessDevice::with_uniform`].
use sandbox_lib::{
    device::{BufferId, BufferTarget, Device, ProgramId, ShaderId, Stage, VertexArrayId},
    layout::VertexBufferElement,
    Error, Result,
};
use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap, HashSet},
};

/// A recorded device call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(Stage, ShaderId),
    ShaderSource(ShaderId),
    CompileShader(ShaderId),
    CompileStatus(ShaderId),
    ShaderInfoLog(ShaderId),
    DeleteShader(ShaderId),
    CreateProgram(ProgramId),
    AttachShader(ProgramId, ShaderId),
    LinkProgram(ProgramId),
    LinkStatus(ProgramId),
    ProgramInfoLog(ProgramId),
    ValidateProgram(ProgramId),
    UseProgram(Option<ProgramId>),
    DeleteProgram(ProgramId),
    UniformLocation(ProgramId, String),
    Uniform1i(i32, i32),
    Uniform1f(i32, f32),
    Uniform4f(i32, [f32; 4]),
    UniformMat4(i32, [f32; 16]),
    CreateBuffer(BufferTarget, BufferId, usize),
    BindBuffer(BufferTarget, Option<BufferId>),
    DeleteBuffer(BufferId),
    CreateVertexArray(VertexArrayId),
    BindVertexArray(Option<VertexArrayId>),
    DeleteVertexArray(VertexArrayId),
    VertexAttrib {
        index: u32,
        element: VertexBufferElement,
        stride: u32,
        offset: usize,
    },
    Viewport(u32, u32),
    ClearColor([f32; 4]),
    Clear,
    DrawElements(u32),
}

struct ShaderObject {
    source: String,
    compiled: Option<bool>,
}

#[derive(Default)]
struct ProgramObject {
    attached: Vec<ShaderId>,
    linked: bool,
}

#[derive(Default)]
struct State {
    next_id: u32,
    shaders: BTreeMap<u32, ShaderObject>,
    programs: BTreeMap<u32, ProgramObject>,
    buffers: HashSet<u32>,
    vertex_arrays: HashSet<u32>,
    calls: Vec<Call>,
    pending_error: Option<PendingError>,
    fail_shader_alloc: Option<Stage>,
    fail_program_alloc: bool,
}

struct PendingError {
    call: Option<&'static str>,
    code: u32,
}

impl State {
    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

pub struct HeadlessDevice {
    error_marker: String,
    link_error_marker: String,
    uniforms: RefCell<HashMap<String, i32>>,
    state: RefCell<State>,
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self {
            error_marker: String::from("#error"),
            link_error_marker: String::from("#link_error"),
            uniforms: RefCell::new(HashMap::new()),
            state: RefCell::new(State::default()),
        }
    }

    /// Fail compilation of any source containing `marker`.
    pub fn with_error_marker(mut self, marker: &str) -> Self {
        self.error_marker = marker.to_string();
        self
    }

    /// Declare a uniform every linked program will resolve to `location`.
    pub fn with_uniform(self, name: &str, location: i32) -> Self {
        self.set_uniform(name, location);
        self
    }

    /// Change the location reported for `name` from now on.
    pub fn set_uniform(&self, name: &str, location: i32) {
        self.uniforms
            .borrow_mut()
            .insert(name.to_string(), location);
    }

    /// Make `create_shader` return the null name for `stage`.
    pub fn fail_shader_alloc(&self, stage: Stage) {
        self.state.borrow_mut().fail_shader_alloc = Some(stage);
    }

    /// Make `create_program` return the null name.
    pub fn fail_program_alloc(&self) {
        self.state.borrow_mut().fail_program_alloc = true;
    }

    /// Make the next call fail the way a GL error flag would.
    pub fn raise_error(&self, code: u32) {
        self.state.borrow_mut().pending_error = Some(PendingError { call: None, code });
    }

    /// Make the next `call` (e.g. `"link_program"`) fail with `code`.
    pub fn raise_error_at(&self, call: &'static str, code: u32) {
        self.state.borrow_mut().pending_error = Some(PendingError {
            call: Some(call),
            code,
        });
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Number of `uniform_location` queries for `name`.
    pub fn uniform_queries(&self, name: &str) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::UniformLocation(_, n) if n == name))
            .count()
    }

    /// Shader objects created and not yet deleted.
    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    /// Program objects created and not yet deleted.
    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.state.borrow().vertex_arrays.len()
    }

    /// Source text last given to `shader`, if it still exists.
    pub fn shader_source_of(&self, shader: ShaderId) -> Option<String> {
        self.state
            .borrow()
            .shaders
            .get(&shader.0)
            .map(|s| s.source.clone())
    }

    /// Record `call`, failing if an error has been raised.
    fn record(&self, name: &'static str, call: Call) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);
        match state.pending_error.take() {
            Some(pending) if pending.call.map_or(true, |call| call == name) => Err(Error::Driver {
                call: name,
                file: file!(),
                line: line!(),
                codes: vec![pending.code],
            }),
            pending => {
                state.pending_error = pending;
                Ok(())
            }
        }
    }

    fn linked(&self, program: ProgramId, name: &'static str) -> Result<bool> {
        self.state
            .borrow()
            .programs
            .get(&program.0)
            .map(|p| p.linked)
            .ok_or_else(|| Self::invalid_value(name))
    }

    /// `GL_INVALID_VALUE`, raised for names that don't exist.
    fn invalid_value(name: &'static str) -> Error {
        Error::Driver {
            call: name,
            file: file!(),
            line: line!(),
            codes: vec![0x0501],
        }
    }
}

impl Device for HeadlessDevice {
    fn create_shader(&self, stage: Stage) -> Result<ShaderId> {
        let id = {
            let mut state = self.state.borrow_mut();
            if state.fail_shader_alloc == Some(stage) {
                0
            } else {
                let id = state.next_id();
                state.shaders.insert(
                    id,
                    ShaderObject {
                        source: String::new(),
                        compiled: None,
                    },
                );
                id
            }
        };
        if let Err(err) = self.record("create_shader", Call::CreateShader(stage, ShaderId(id))) {
            self.state.borrow_mut().shaders.remove(&id);
            return Err(err);
        }
        Ok(ShaderId(id))
    }

    fn shader_source(&self, shader: ShaderId, source: &str) -> Result<()> {
        match self.state.borrow_mut().shaders.get_mut(&shader.0) {
            Some(object) => object.source = source.to_string(),
            None => return Err(Self::invalid_value("shader_source")),
        }
        self.record("shader_source", Call::ShaderSource(shader))
    }

    fn compile_shader(&self, shader: ShaderId) -> Result<()> {
        {
            let mut state = self.state.borrow_mut();
            let object = state
                .shaders
                .get_mut(&shader.0)
                .ok_or_else(|| Self::invalid_value("compile_shader"))?;
            object.compiled = Some(!object.source.contains(&self.error_marker));
        }
        self.record("compile_shader", Call::CompileShader(shader))
    }

    fn compile_status(&self, shader: ShaderId) -> Result<bool> {
        let compiled = self
            .state
            .borrow()
            .shaders
            .get(&shader.0)
            .ok_or_else(|| Self::invalid_value("compile_status"))?
            .compiled;
        self.record("compile_status", Call::CompileStatus(shader))?;
        Ok(compiled == Some(true))
    }

    fn shader_info_log(&self, shader: ShaderId) -> Result<String> {
        let log = {
            let state = self.state.borrow();
            let object = state
                .shaders
                .get(&shader.0)
                .ok_or_else(|| Self::invalid_value("shader_info_log"))?;
            object
                .source
                .lines()
                .enumerate()
                .find(|(_, line)| line.contains(&self.error_marker))
                .map(|(n, _)| format!("0:{}: error: unexpected '{}'", n + 1, self.error_marker))
                .unwrap_or_default()
        };
        self.record("shader_info_log", Call::ShaderInfoLog(shader))?;
        Ok(log)
    }

    fn delete_shader(&self, shader: ShaderId) -> Result<()> {
        self.state.borrow_mut().shaders.remove(&shader.0);
        self.record("delete_shader", Call::DeleteShader(shader))
    }

    fn create_program(&self) -> Result<ProgramId> {
        let id = {
            let mut state = self.state.borrow_mut();
            if state.fail_program_alloc {
                0
            } else {
                let id = state.next_id();
                state.programs.insert(id, ProgramObject::default());
                id
            }
        };
        if let Err(err) = self.record("create_program", Call::CreateProgram(ProgramId(id))) {
            self.state.borrow_mut().programs.remove(&id);
            return Err(err);
        }
        Ok(ProgramId(id))
    }

    fn attach_shader(&self, program: ProgramId, shader: ShaderId) -> Result<()> {
        {
            let mut state = self.state.borrow_mut();
            if !state.shaders.contains_key(&shader.0) {
                return Err(Self::invalid_value("attach_shader"));
            }
            state
                .programs
                .get_mut(&program.0)
                .ok_or_else(|| Self::invalid_value("attach_shader"))?
                .attached
                .push(shader);
        }
        self.record("attach_shader", Call::AttachShader(program, shader))
    }

    fn link_program(&self, program: ProgramId) -> Result<()> {
        {
            let mut state = self.state.borrow_mut();
            let attached = state
                .programs
                .get(&program.0)
                .ok_or_else(|| Self::invalid_value("link_program"))?
                .attached
                .clone();
            let linked = attached.len() == 2
                && attached.iter().all(|s| match state.shaders.get(&s.0) {
                    Some(object) => {
                        object.compiled == Some(true)
                            && !object.source.contains(&self.link_error_marker)
                    }
                    None => false,
                });
            if let Some(object) = state.programs.get_mut(&program.0) {
                object.linked = linked;
            }
        }
        self.record("link_program", Call::LinkProgram(program))
    }

    fn link_status(&self, program: ProgramId) -> Result<bool> {
        let linked = self.linked(program, "link_status")?;
        self.record("link_status", Call::LinkStatus(program))?;
        Ok(linked)
    }

    fn program_info_log(&self, program: ProgramId) -> Result<String> {
        let linked = self.linked(program, "program_info_log")?;
        self.record("program_info_log", Call::ProgramInfoLog(program))?;
        if linked {
            Ok(String::new())
        } else {
            Ok(String::from("error: unresolved symbols"))
        }
    }

    fn validate_program(&self, program: ProgramId) -> Result<()> {
        self.record("validate_program", Call::ValidateProgram(program))
    }

    fn use_program(&self, program: Option<ProgramId>) -> Result<()> {
        self.record("use_program", Call::UseProgram(program))
    }

    fn delete_program(&self, program: ProgramId) -> Result<()> {
        self.state.borrow_mut().programs.remove(&program.0);
        self.record("delete_program", Call::DeleteProgram(program))
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Result<i32> {
        self.record(
            "uniform_location",
            Call::UniformLocation(program, name.to_string()),
        )?;
        let linked = self
            .state
            .borrow()
            .programs
            .get(&program.0)
            .map(|p| p.linked)
            .unwrap_or(false);
        if !linked {
            return Err(Self::invalid_value("uniform_location"));
        }
        Ok(self.uniforms.borrow().get(name).copied().unwrap_or(-1))
    }

    fn uniform_1i(&self, location: i32, value: i32) -> Result<()> {
        self.record("uniform_1i", Call::Uniform1i(location, value))
    }

    fn uniform_1f(&self, location: i32, value: f32) -> Result<()> {
        self.record("uniform_1f", Call::Uniform1f(location, value))
    }

    fn uniform_4f(&self, location: i32, value: [f32; 4]) -> Result<()> {
        self.record("uniform_4f", Call::Uniform4f(location, value))
    }

    fn uniform_mat4(&self, location: i32, value: &[f32; 16]) -> Result<()> {
        self.record("uniform_mat4", Call::UniformMat4(location, *value))
    }

    fn create_buffer(&self, target: BufferTarget, data: &[u8]) -> Result<BufferId> {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id();
            state.buffers.insert(id);
            BufferId(id)
        };
        self.record("create_buffer", Call::CreateBuffer(target, id, data.len()))?;
        Ok(id)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferId>) -> Result<()> {
        self.record("bind_buffer", Call::BindBuffer(target, buffer))
    }

    fn delete_buffer(&self, buffer: BufferId) -> Result<()> {
        self.state.borrow_mut().buffers.remove(&buffer.0);
        self.record("delete_buffer", Call::DeleteBuffer(buffer))
    }

    fn create_vertex_array(&self) -> Result<VertexArrayId> {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id();
            state.vertex_arrays.insert(id);
            VertexArrayId(id)
        };
        self.record("create_vertex_array", Call::CreateVertexArray(id))?;
        Ok(id)
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayId>) -> Result<()> {
        self.record("bind_vertex_array", Call::BindVertexArray(vertex_array))
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayId) -> Result<()> {
        self.state.borrow_mut().vertex_arrays.remove(&vertex_array.0);
        self.record("delete_vertex_array", Call::DeleteVertexArray(vertex_array))
    }

    fn vertex_attrib(
        &self,
        index: u32,
        element: &VertexBufferElement,
        stride: u32,
        offset: usize,
    ) -> Result<()> {
        self.record(
            "vertex_attrib",
            Call::VertexAttrib {
                index,
                element: *element,
                stride,
                offset,
            },
        )
    }

    fn viewport(&self, width: u32, height: u32) -> Result<()> {
        self.record("viewport", Call::Viewport(width, height))
    }

    fn clear_color(&self, color: [f32; 4]) -> Result<()> {
        self.record("clear_color", Call::ClearColor(color))
    }

    fn clear(&self) -> Result<()> {
        self.record("clear", Call::Clear)
    }

    fn draw_elements(&self, count: u32) -> Result<()> {
        self.record("draw_elements", Call::DrawElements(count))
    }
}

#[cfg(test)]
mod tests {
    use super::{Call, HeadlessDevice};
    use sandbox_lib::device::{Device, Stage};

    #[test]
    fn compile_fails_on_marker() {
        let device = HeadlessDevice::new();
        let ok = device.create_shader(Stage::Vertex).unwrap();
        let bad = device.create_shader(Stage::Fragment).unwrap();
        device.shader_source(ok, "void main() {}\n").unwrap();
        device.shader_source(bad, "void main() {\n#error\n}\n").unwrap();
        device.compile_shader(ok).unwrap();
        device.compile_shader(bad).unwrap();
        assert!(device.compile_status(ok).unwrap());
        assert!(!device.compile_status(bad).unwrap());
        assert_eq!(
            "0:2: error: unexpected '#error'",
            device.shader_info_log(bad).unwrap()
        );
    }

    #[test]
    fn raised_error_fails_next_call_only() {
        let device = HeadlessDevice::new();
        device.raise_error(0x0502);
        let err = device.clear().unwrap_err();
        assert!(err.is_fatal());
        assert!(device.clear().is_ok());
    }

    #[test]
    fn queries_are_recorded() {
        let device = HeadlessDevice::new();
        let shader = device.create_shader(Stage::Vertex).unwrap();
        device.shader_source(shader, "void main() {}\n").unwrap();
        device.compile_status(shader).unwrap();
        device.shader_info_log(shader).unwrap();
        let program = device.create_program().unwrap();
        device.link_status(program).unwrap();
        device.program_info_log(program).unwrap();

        assert_eq!(
            vec![
                Call::CreateShader(Stage::Vertex, shader),
                Call::ShaderSource(shader),
                Call::CompileStatus(shader),
                Call::ShaderInfoLog(shader),
                Call::CreateProgram(program),
                Call::LinkStatus(program),
                Call::ProgramInfoLog(program),
            ],
            device.calls()
        );
    }

    #[test]
    fn error_raised_at_a_named_call() {
        let device = HeadlessDevice::new();
        let shader = device.create_shader(Stage::Fragment).unwrap();
        device.raise_error_at("shader_info_log", 0x0502);

        assert!(device.shader_source(shader, "").is_ok());
        assert!(device.compile_status(shader).is_ok());
        assert!(device.shader_info_log(shader).unwrap_err().is_fatal());
        assert!(device.shader_info_log(shader).is_ok());
    }

    #[test]
    fn null_shader_for_failing_stage() {
        let device = HeadlessDevice::new();
        device.fail_shader_alloc(Stage::Fragment);

        assert_ne!(0, device.create_shader(Stage::Vertex).unwrap().0);
        assert_eq!(0, device.create_shader(Stage::Fragment).unwrap().0);
        assert_eq!(1, device.live_shaders());
    }
}
