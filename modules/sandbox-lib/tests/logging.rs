use log::{Level, LevelFilter, Log, Metadata, Record};
use sandbox_backend_headless::HeadlessDevice;
use sandbox_lib::{shader::Shader, source::ShaderSource};
use std::{cell::RefCell, rc::Rc};

// records are kept per thread, tests run concurrently
thread_local! {
    static RECORDS: RefCell<Vec<(Level, String, String)>> = RefCell::new(Vec::new());
}

struct Capture;

impl Log for Capture {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        RECORDS.with(|records| {
            records.borrow_mut().push((
                record.level(),
                record.target().to_string(),
                record.args().to_string(),
            ))
        });
    }

    fn flush(&self) {}
}

static LOGGER: Capture = Capture;

fn capture() {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(LevelFilter::Trace);
    RECORDS.with(|records| records.borrow_mut().clear());
}

fn records(level: Level, target: &str) -> Vec<String> {
    RECORDS.with(|records| {
        records
            .borrow()
            .iter()
            .filter(|(l, t, _)| *l == level && t == target)
            .map(|(_, _, message)| message.clone())
            .collect()
    })
}

fn source(fragment: &str) -> ShaderSource {
    ShaderSource {
        vertex: String::from("void main() {}\n"),
        fragment: fragment.to_string(),
    }
}

#[test]
fn missing_uniform_warns_once() {
    let device = Rc::new(HeadlessDevice::new().with_uniform("u_Color", 0));
    let mut shader =
        Shader::from_source(device, &source("void main() {}\n"), "basic.shader").unwrap();
    capture();

    for _ in 0..3 {
        assert_eq!(-1, shader.uniform_location("u_Missing").unwrap());
        assert_eq!(0, shader.uniform_location("u_Color").unwrap());
    }

    let warnings = records(Level::Warn, "shader");
    assert_eq!(1, warnings.len());
    assert_eq!("uniform 'u_Missing' doesn't exist in basic.shader", warnings[0]);
}

#[test]
fn compile_failure_is_logged_with_stage() {
    let device = HeadlessDevice::new();
    capture();

    let result = sandbox_lib::shader::create_program(&device, &source("#error\n"));

    assert!(result.is_err());
    let errors = records(Level::Error, "shader");
    assert_eq!(
        vec![
            String::from("Failed to compile fragment shader!"),
            String::from("0:1: error: unexpected '#error'"),
        ],
        errors
    );
}
