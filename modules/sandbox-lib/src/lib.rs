#![cfg_attr(not(debug_assertions),
            warn(dead_code, unused_imports, unused_variables))]
#![deny(clippy::style, clippy::correctness, clippy::complexity, clippy::perf)]
pub use error::{Error, Result};

pub mod buffer;
pub mod device;
mod error;
pub mod layout;
pub mod menu;
pub mod renderer;
pub mod shader;
pub mod source;
