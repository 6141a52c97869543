use crate::scenes::Test;
use imgui::{im_str, ColorEdit, Ui};
use sandbox_backend_gl::GlDevice;
use sandbox_lib::{renderer::Renderer, Result};
use std::rc::Rc;

pub struct ClearColor {
    renderer: Renderer<GlDevice>,
    color: [f32; 4],
}

impl ClearColor {
    pub fn new(device: Rc<GlDevice>) -> Self {
        Self {
            renderer: Renderer::new(device),
            color: [0.2, 0.3, 0.8, 1.0],
        }
    }
}

impl Test for ClearColor {
    fn on_render(&mut self) -> Result<()> {
        self.renderer.clear_color(self.color)?;
        self.renderer.clear()
    }

    fn on_imgui_render(&mut self, ui: &Ui) {
        ColorEdit::new(im_str!("Clear Color"), &mut self.color).build(ui);
    }
}
