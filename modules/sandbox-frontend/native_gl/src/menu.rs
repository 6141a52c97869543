use crate::scenes::Test;
use imgui::{im_str, Ui};
use sandbox_lib::menu::TestMenu;

/// One button per registered test. Returns the index of the pressed one.
pub fn draw(ui: &Ui, menu: &TestMenu<dyn Test>) -> Option<usize> {
    let mut selected = None;
    for (i, name) in menu.names().enumerate() {
        if ui.button(&im_str!("{}", name), [0.0, 0.0]) {
            selected = Some(i);
        }
    }
    selected
}
