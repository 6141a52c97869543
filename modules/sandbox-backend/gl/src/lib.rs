//! OpenGL implementation of [`sandbox_lib::device::Device`].
use sandbox_lib::{Error, Result};

/// Run a GL call and turn any error flag it raises into an [`Error::Driver`].
///
/// Pending flags from earlier calls are drained first so they are not
/// blamed on this one.
macro_rules! gl_call {
    ($call:expr) => {{
        crate::clear_errors();
        #[allow(unused_unsafe)]
        let result = unsafe { $call };
        crate::check_errors(stringify!($call), file!(), line!()).map(|_| result)
    }};
}

mod device;

pub use device::GlDevice;

fn clear_errors() {
    unsafe { while gl::GetError() != gl::NO_ERROR {} }
}

fn check_errors(call: &'static str, file: &'static str, line: u32) -> Result<()> {
    let mut codes = Vec::new();
    loop {
        let code = unsafe { gl::GetError() };
        if code == gl::NO_ERROR {
            break;
        }
        log::error!(target: "gl", "[OpenGL Error] ({:#06x}) {} {}:{}", code, call, file, line);
        codes.push(code);
    }
    if codes.is_empty() {
        Ok(())
    } else {
        Err(Error::Driver {
            call,
            file,
            line,
            codes,
        })
    }
}
