#![deny(clippy::style, clippy::correctness, clippy::complexity, clippy::perf)]
use crate::{config::Config, scenes::Test};
use imgui::{im_str, Context};
use imgui_opengl_renderer::Renderer as ImguiRenderer;
use imgui_sdl2::ImguiSdl2;
use sandbox_backend_gl::GlDevice;
use sandbox_lib::{menu::TestMenu, renderer::Renderer, Result};
use sdl2::{
    event::{Event, WindowEvent},
    keyboard::Scancode,
    video::GLProfile,
    EventPump,
};
use std::{
    rc::Rc,
    thread,
    time::{Duration, Instant},
};

mod config;
mod menu;
mod scenes;

/// Log `result`. Driver errors abort the process, anything else is
/// reported back as `false` so the caller can drop the failing test.
fn check(result: Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) if err.is_fatal() => {
            log::error!("{}", err);
            std::process::abort();
        }
        Err(err) => {
            log::error!("{}", err);
            false
        }
    }
}

fn register_tests(device: &Rc<GlDevice>, config: &Config) -> TestMenu<dyn Test> {
    let mut menu = TestMenu::<dyn Test>::new();
    let clear_color = device.clone();
    let uniform_color = device.clone();
    let shader = config.shader.clone();
    menu.register("Clear Color", move || {
        Ok(Box::new(scenes::ClearColor::new(clear_color.clone())))
    })
    .register("Uniform Color", move || {
        Ok(Box::new(scenes::UniformColor::new(uniform_color.clone(), &shader)?))
    });
    menu
}

fn main() {
    env_logger::init();

    let config = Config::from_args();

    let sdl = sdl2::init().expect("Error initializing SDL");
    let video = sdl.video().expect("Error initializing video");
    {
        let attr = video.gl_attr();
        attr.set_context_profile(GLProfile::Core);
        attr.set_context_version(3, 3);
    }
    let window = video
        .window(&config.title, config.width, config.height)
        .opengl()
        .position_centered()
        .resizable()
        .build()
        .expect("Error creating window");

    let gl_ctx = window
        .gl_create_context()
        .expect("Error creating GL context");
    window
        .gl_make_current(&gl_ctx)
        .expect("Error setting GL context");

    if let Err(err) = video.gl_set_swap_interval(if config.vsync { 1 } else { 0 }) {
        log::warn!("Error setting swap interval: {}", err);
    }

    let device = Rc::new(GlDevice::load_with(|s| video.gl_get_proc_address(s) as _));
    let renderer = Renderer::new(device.clone());

    let mut imgui = Context::create();
    let imgui_gl = ImguiRenderer::new(&mut imgui, |s| video.gl_get_proc_address(s) as _);
    let mut imgui_sdl = ImguiSdl2::new(&mut imgui, &window);

    let menu = register_tests(&device, &config);
    let mut current: Option<Box<dyn Test>> = None;

    log::info!("{} tests registered", menu.len());

    let mut event_pump = sdl.event_pump().expect("Error creating event pump");
    let mut last = Instant::now();
    loop {
        let time = Instant::now();
        let delta = time.duration_since(last).as_secs_f32();
        last = time;

        if handle_input(&mut event_pump, &mut imgui, &mut imgui_sdl) {
            break;
        }

        let (width, height) = window.drawable_size();
        check(renderer.viewport(width, height));
        check(renderer.clear_color([0.0, 0.0, 0.0, 1.0]));
        check(renderer.clear());

        if let Some(test) = &mut current {
            if !(check(test.on_update(delta)) && check(test.on_render())) {
                current = None;
            }
        }

        imgui_sdl.prepare_frame(imgui.io_mut(), &window, &event_pump.mouse_state());
        let ui = imgui.frame();
        let mut selected = None;
        let mut back = false;
        imgui::Window::new(im_str!("Test"))
            .always_auto_resize(true)
            .build(&ui, || {
                match &mut current {
                    Some(test) => {
                        back = ui.button(im_str!("<-"), [0.0, 0.0]);
                        test.on_imgui_render(&ui);
                    }
                    None => selected = menu::draw(&ui, &menu),
                }
                ui.text(format!(
                    "Application average {:.3} ms/frame ({:.1} FPS)",
                    1000.0 / ui.io().framerate,
                    ui.io().framerate
                ));
            });

        if back {
            current = None;
        }
        if let Some(index) = selected {
            current = match menu.create(index) {
                Some(Ok(test)) => Some(test),
                Some(Err(err)) => {
                    check(Err(err));
                    None
                }
                None => None,
            };
        }

        imgui_sdl.prepare_render(&ui, &window);
        imgui_gl.render(ui);

        if !config.vsync {
            let elapsed = time.elapsed();
            let sleep = Duration::new(0, 1_000_000_000 / 60);
            if elapsed < sleep {
                thread::sleep(sleep - elapsed);
            }
        }

        window.gl_swap_window();
    }
}

fn handle_input(event_pump: &mut EventPump, imgui: &mut Context, imgui_sdl: &mut ImguiSdl2) -> bool {
    for event in event_pump.poll_iter() {
        imgui_sdl.handle_event(imgui, &event);
        if imgui_sdl.ignore_event(&event) {
            continue;
        }
        match event {
            Event::Window {
                win_event: WindowEvent::Close,
                ..
            }
            | Event::KeyDown {
                scancode: Some(Scancode::Escape),
                ..
            }
            | Event::Quit { .. } => return true,
            _ => {}
        }
    }
    false
}
