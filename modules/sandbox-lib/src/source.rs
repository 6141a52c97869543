use crate::{Error, Result};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

const MARKER: &str = "#shader";

/// Vertex and fragment sources split out of a single `.shader` file.
///
/// Sections are introduced by marker lines:
///
/// ```text
/// #shader vertex
/// ...
/// #shader fragment
/// ...
/// ```
///
/// Markers are matched anywhere in the line. Lines before the first marker
/// are dropped.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

#[derive(Copy, Clone)]
enum Section {
    None,
    Vertex,
    Fragment,
}

impl ShaderSource {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let io_error = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_error)?;
        Self::parse(BufReader::new(file)).map_err(|err| match err {
            Error::Io { source, .. } => io_error(source),
            err => err,
        })
    }

    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut source = Self::default();
        let mut section = Section::None;
        for line in reader.lines() {
            let line = line.map_err(|source| Error::Io {
                path: Default::default(),
                source,
            })?;
            if line.contains(MARKER) {
                if line.contains("vertex") {
                    section = Section::Vertex;
                } else if line.contains("fragment") {
                    section = Section::Fragment;
                }
                continue;
            }
            let target = match section {
                Section::None => continue,
                Section::Vertex => &mut source.vertex,
                Section::Fragment => &mut source.fragment,
            };
            target.push_str(&line);
            target.push('\n');
        }
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::ShaderSource;

    fn parse(text: &str) -> ShaderSource {
        ShaderSource::parse(text.as_bytes()).unwrap()
    }

    #[test]
    fn vertex_only() {
        let source = parse("#shader vertex\na\nb\nc\n");
        assert_eq!("a\nb\nc\n", source.vertex);
        assert_eq!("", source.fragment);
    }

    #[test]
    fn no_markers() {
        let source = parse("#version 330 core\nvoid main() {}\n");
        assert_eq!(ShaderSource::default(), source);
    }

    #[test]
    fn empty_input() {
        assert_eq!(ShaderSource::default(), parse(""));
    }

    #[test]
    fn switching_sections() {
        let source = parse(
            "#shader vertex\n\
             v0\n\
             #shader fragment\n\
             f0\n\
             f1\n",
        );
        assert_eq!("v0\n", source.vertex);
        assert_eq!("f0\nf1\n", source.fragment);
    }

    #[test]
    fn switching_back_appends() {
        let source = parse("#shader vertex\nv0\n#shader fragment\nf0\n#shader vertex\nv1\n");
        assert_eq!("v0\nv1\n", source.vertex);
        assert_eq!("f0\n", source.fragment);
    }

    #[test]
    fn preamble_is_dropped() {
        let source = parse("// header\n\n#shader fragment\nf0\n");
        assert_eq!("", source.vertex);
        assert_eq!("f0\n", source.fragment);
    }

    #[test]
    fn unknown_marker_keeps_section() {
        let source = parse("#shader vertex\nv0\n#shader geometry\nv1\n");
        assert_eq!("v0\nv1\n", source.vertex);
    }

    #[test]
    fn marker_inside_comment_switches() {
        let source = parse("#shader vertex\nv0\n// see #shader fragment below\nf0\n");
        assert_eq!("v0\n", source.vertex);
        assert_eq!("f0\n", source.fragment);
    }

    #[test]
    fn missing_last_newline() {
        let source = parse("#shader vertex\nv0");
        assert_eq!("v0\n", source.vertex);
    }

    #[test]
    fn missing_file() {
        let err = ShaderSource::from_file("does/not/exist.shader").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.shader"));
    }
}
