use crate::device::Stage;
use std::{io, path::PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Error reading shader source {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to compile {stage} shader: {log}")]
    Compile { stage: Stage, log: String },

    #[error("Failed to link program: {log}")]
    Link { log: String },

    /// The driver returned the null name when asked for a new object.
    #[error("Driver failed to allocate a {0} object")]
    Allocation(&'static str),

    /// Error flags raised by the driver around a single call.
    #[error("[OpenGL Error] {codes:?} {call} {file}:{line}")]
    Driver {
        call: &'static str,
        file: &'static str,
        line: u32,
        codes: Vec<u32>,
    },
}

impl Error {
    /// Driver errors are programming defects. Callers should not try to
    /// recover from them.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Driver { .. })
    }
}
