use imgui::Ui;
use sandbox_lib::Result;

mod clear_color;
mod uniform_color;

pub use clear_color::ClearColor;
pub use uniform_color::UniformColor;

/// An interactive scene selectable from the test menu.
pub trait Test {
    /// Advance the test by `delta` seconds.
    fn on_update(&mut self, _delta: f32) -> Result<()> {
        Ok(())
    }

    fn on_render(&mut self) -> Result<()> {
        Ok(())
    }

    fn on_imgui_render(&mut self, _ui: &Ui) {}
}
