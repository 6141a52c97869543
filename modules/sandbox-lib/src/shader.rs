use crate::{
    device::{Device, ProgramId, ShaderId, Stage},
    source::ShaderSource,
    Error, Result,
};
use glam::Mat4;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    rc::Rc,
};

/// A linked shader program.
///
/// Uniform locations are resolved lazily and cached for the lifetime of the
/// program, including the ones the driver doesn't know about (`-1`).
pub struct Shader<D: Device> {
    device: Rc<D>,
    program: ProgramId,
    path: PathBuf,
    uniforms: HashMap<String, i32>,
}

impl<D: Device> Shader<D> {
    /// Load, compile and link the `.shader` file at `path`.
    pub fn from_file<P: AsRef<Path>>(device: Rc<D>, path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = ShaderSource::from_file(path)?;
        let program = create_program(&*device, &source)?;
        log::debug!(target: "shader", "Linked {} as program {}", path.display(), program.0);
        Ok(Self {
            device,
            program,
            path: path.to_path_buf(),
            uniforms: HashMap::new(),
        })
    }

    /// Compile and link an in-memory source. `path` is only used in
    /// diagnostics.
    pub fn from_source<P: Into<PathBuf>>(
        device: Rc<D>,
        source: &ShaderSource,
        path: P,
    ) -> Result<Self> {
        let program = create_program(&*device, source)?;
        Ok(Self {
            device,
            program,
            path: path.into(),
            uniforms: HashMap::new(),
        })
    }

    pub fn id(&self) -> ProgramId {
        self.program
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bind(&self) -> Result<()> {
        self.device.use_program(Some(self.program))
    }

    pub fn unbind(&self) -> Result<()> {
        self.device.use_program(None)
    }

    pub fn set_uniform_1i(&mut self, name: &str, value: i32) -> Result<()> {
        let location = self.uniform_location(name)?;
        self.device.uniform_1i(location, value)
    }

    pub fn set_uniform_1f(&mut self, name: &str, value: f32) -> Result<()> {
        let location = self.uniform_location(name)?;
        self.device.uniform_1f(location, value)
    }

    pub fn set_uniform_4f(&mut self, name: &str, v0: f32, v1: f32, v2: f32, v3: f32) -> Result<()> {
        let location = self.uniform_location(name)?;
        self.device.uniform_4f(location, [v0, v1, v2, v3])
    }

    pub fn set_uniform_mat4(&mut self, name: &str, matrix: &Mat4) -> Result<()> {
        let location = self.uniform_location(name)?;
        self.device.uniform_mat4(location, &matrix.to_cols_array())
    }

    /// Returns the location of the uniform `name`, or `-1` if the program
    /// doesn't have it. The driver is queried once per name.
    pub fn uniform_location(&mut self, name: &str) -> Result<i32> {
        if let Some(location) = self.uniforms.get(name) {
            return Ok(*location);
        }
        let location = self.device.uniform_location(self.program, name)?;
        if location == -1 {
            log::warn!(target: "shader", "uniform '{}' doesn't exist in {}", name, self.path.display());
        }
        self.uniforms.insert(name.to_string(), location);
        Ok(location)
    }
}

impl<D: Device> Drop for Shader<D> {
    fn drop(&mut self) {
        discard_program(&*self.device, self.program);
    }
}

/// Compile a single stage. A stage that fails to compile is logged, deleted
/// and its info log returned in the inner `Err`, so the caller can still try
/// the other one.
fn compile_shader<D: Device + ?Sized>(
    device: &D,
    stage: Stage,
    source: &str,
) -> Result<std::result::Result<ShaderId, String>> {
    let shader = device.create_shader(stage)?;
    if shader.0 == 0 {
        return Err(Error::Allocation("shader"));
    }
    let compiled = device
        .shader_source(shader, source)
        .and_then(|_| device.compile_shader(shader))
        .and_then(|_| device.compile_status(shader));
    match compiled {
        Ok(true) => Ok(Ok(shader)),
        Ok(false) => {
            let log = device.shader_info_log(shader);
            discard_shader(device, shader);
            let log = log?;
            log::error!(target: "shader", "Failed to compile {} shader!", stage);
            log::error!(target: "shader", "{}", log);
            Ok(Err(log))
        }
        Err(err) => {
            discard_shader(device, shader);
            Err(err)
        }
    }
}

/// Attach both stages to `program`, link and validate it.
fn link_program<D: Device + ?Sized>(
    device: &D,
    program: ProgramId,
    vs: ShaderId,
    fs: ShaderId,
) -> Result<()> {
    device.attach_shader(program, vs)?;
    device.attach_shader(program, fs)?;
    device.link_program(program)?;

    if !device.link_status(program)? {
        let log = device.program_info_log(program)?;
        log::error!(target: "shader", "Failed to link program!");
        log::error!(target: "shader", "{}", log);
        return Err(Error::Link { log });
    }

    device.validate_program(program)
}

/// Compile both stages of `source` and link them into a new program.
///
/// Both stages are always compiled so every error gets reported, but no
/// program is created unless both of them succeed. Every driver object made
/// along the way is released when an error is returned.
pub fn create_program<D: Device + ?Sized>(device: &D, source: &ShaderSource) -> Result<ProgramId> {
    let vs = compile_shader(device, Stage::Vertex, &source.vertex)?;
    let fs = match compile_shader(device, Stage::Fragment, &source.fragment) {
        Ok(fs) => fs,
        Err(err) => {
            if let Ok(vs) = vs {
                discard_shader(device, vs);
            }
            return Err(err);
        }
    };

    let (vs, fs) = match (vs, fs) {
        (Ok(vs), Ok(fs)) => (vs, fs),
        (Err(log), other) => {
            if let Ok(fs) = other {
                discard_shader(device, fs);
            }
            return Err(Error::Compile { stage: Stage::Vertex, log });
        }
        (Ok(vs), Err(log)) => {
            discard_shader(device, vs);
            return Err(Error::Compile { stage: Stage::Fragment, log });
        }
    };

    let program = match device.create_program() {
        Ok(program) if program.0 != 0 => program,
        other => {
            discard_shader(device, vs);
            discard_shader(device, fs);
            return Err(other.err().unwrap_or(Error::Allocation("program")));
        }
    };

    if let Err(err) = link_program(device, program, vs, fs) {
        discard_program(device, program);
        discard_shader(device, vs);
        discard_shader(device, fs);
        return Err(err);
    }

    // the program keeps the compiled code around after linking
    device.delete_shader(vs)?;
    device.delete_shader(fs)?;

    Ok(program)
}

fn discard_shader<D: Device + ?Sized>(device: &D, shader: ShaderId) {
    if let Err(err) = device.delete_shader(shader) {
        log::error!(target: "shader", "Error deleting shader {}: {}", shader.0, err);
    }
}

fn discard_program<D: Device + ?Sized>(device: &D, program: ProgramId) {
    if let Err(err) = device.delete_program(program) {
        log::error!(target: "shader", "Error deleting program {}: {}", program.0, err);
    }
}
