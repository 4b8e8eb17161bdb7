//! Draws a [`ControlPanel`] as an ImGui window of collapsible folders

use crate::controls::{ControlKind, ControlPanel, ControlValue, Folder};
use crate::gfx::color::Color;

/// Draws the panel and forwards every widget change to [`ControlPanel::set_at`]
pub fn control_panel_window(ui: &imgui::Ui, panel: &mut ControlPanel) {
    if panel.is_empty() {
        return;
    }
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }

    let tree = panel.tree();
    let mut changes = Vec::new();
    ui.window(&panel.title)
        .size([320.0, 360.0], imgui::Condition::FirstUseEver)
        .position([display_size[0] - 330.0, 10.0], imgui::Condition::FirstUseEver)
        .collapsible(true)
        .build(|| draw_folder(ui, panel, &tree, &mut changes));

    for (index, value) in changes {
        if let Err(err) = panel.set_at(index, value) {
            log::warn!("{err}");
        }
    }
}

fn draw_folder(
    ui: &imgui::Ui,
    panel: &ControlPanel,
    folder: &Folder,
    changes: &mut Vec<(usize, ControlValue)>,
) {
    for &index in &folder.controls {
        if let Some(change) = draw_control(ui, panel, index) {
            changes.push((index, change));
        }
    }
    for child in &folder.children {
        ui.tree_node_config(&child.name)
            .default_open(true)
            .build(|| draw_folder(ui, panel, child, changes));
    }
}

fn draw_control(ui: &imgui::Ui, panel: &ControlPanel, index: usize) -> Option<ControlValue> {
    let control = panel.controls().get(index)?;
    match (control.kind, control.value()) {
        (ControlKind::Slider { min, max }, ControlValue::Scalar(mut v)) => ui
            .slider(&control.label, min, max, &mut v)
            .then_some(ControlValue::Scalar(v)),
        (ControlKind::Color, ControlValue::Color(c)) => {
            let mut rgb = c.to_array();
            ui.color_edit3(&control.label, &mut rgb)
                .then(|| ControlValue::Color(Color::rgb(rgb[0], rgb[1], rgb[2])))
        }
        _ => None,
    }
}
