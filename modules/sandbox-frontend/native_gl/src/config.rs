use clap::{value_t, App, Arg};
use std::{ffi::OsString, path::PathBuf};

const SHADER: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/res/shaders/basic.shader");

pub struct Config {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Shader used by the tests that draw geometry.
    pub shader: PathBuf,
    pub vsync: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
            title: String::from("gl-sandbox"),
            shader: PathBuf::from(SHADER),
            vsync: false,
        }
    }
}

impl Config {
    /// Parse the process arguments, exiting with a usage message on error.
    pub fn from_args() -> Self {
        Self::parse_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    pub fn parse_from<I, T>(args: I) -> clap::Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let default = Config::default();
        let matches = App::new("gl-sandbox")
            .about("OpenGL test sandbox")
            .arg(
                Arg::with_name("width")
                    .long("width")
                    .value_name("PIXELS")
                    .takes_value(true)
                    .help("Window width"),
            )
            .arg(
                Arg::with_name("height")
                    .long("height")
                    .value_name("PIXELS")
                    .takes_value(true)
                    .help("Window height"),
            )
            .arg(
                Arg::with_name("title")
                    .long("title")
                    .takes_value(true)
                    .help("Window title"),
            )
            .arg(
                Arg::with_name("shader")
                    .long("shader")
                    .value_name("PATH")
                    .takes_value(true)
                    .help("Combined .shader file used by the drawing tests"),
            )
            .arg(
                Arg::with_name("vsync")
                    .long("vsync")
                    .help("Sync buffer swaps with the display refresh rate"),
            )
            .get_matches_from_safe(args)?;

        let width = if matches.is_present("width") {
            value_t!(matches, "width", u32)?
        } else {
            default.width
        };
        let height = if matches.is_present("height") {
            value_t!(matches, "height", u32)?
        } else {
            default.height
        };

        Ok(Self {
            width,
            height,
            title: matches
                .value_of("title")
                .map(String::from)
                .unwrap_or(default.title),
            shader: matches
                .value_of_os("shader")
                .map(PathBuf::from)
                .unwrap_or(default.shader),
            vsync: matches.is_present("vsync"),
        })
    }
}
