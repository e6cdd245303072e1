use eframe::egui::{self, Button, RichText, Sense, Ui};

use super::style;
use crate::egui_app::controller::EguiController;
use crate::egui_app::state::EntryForm;

pub(super) fn render_entry_forms(controller: &mut EguiController, ui: &mut Ui) {
    ui.horizontal(|ui| {
        for (form, label) in [
            (EntryForm::Upload, "Upload Excel"),
            (EntryForm::Manual, "Manual Entry"),
        ] {
            if toggle_button(ui, label, controller.ui.view.entry_form == form) {
                controller.select_entry_form(form);
            }
        }
    });
    ui.add_space(8.0);
    match controller.ui.view.entry_form {
        EntryForm::None => {}
        EntryForm::Upload => render_upload_form(controller, ui),
        EntryForm::Manual => render_manual_form(controller, ui),
    }
}

/// Draw a form toggle; returns true when clicked.
fn toggle_button(ui: &mut Ui, label: &str, selected: bool) -> bool {
    let id = ui.make_persistent_id(("entry_toggle", label));
    // Hover state from the previous frame keeps styling declarative.
    let hovered = ui.ctx().data(|data| data.get_temp::<bool>(id).unwrap_or(false));
    let look = style::toggle_button_style(selected, hovered);
    let response = ui.add(
        Button::new(RichText::new(label).color(look.text).strong())
            .fill(look.fill)
            .min_size(egui::vec2(140.0, 32.0))
            .sense(Sense::click()),
    );
    let now_hovered = response.hovered();
    if now_hovered != hovered {
        ui.ctx().data_mut(|data| data.insert_temp(id, now_hovered));
        ui.ctx().request_repaint();
    }
    response.clicked()
}

fn render_upload_form(controller: &mut EguiController, ui: &mut Ui) {
    ui.group(|ui| {
        ui.label(RichText::new("Bulk upload").strong());
        ui.horizontal(|ui| {
            if ui.button("Choose file").clicked() {
                controller.choose_upload_file();
            }
            let chosen = controller
                .ui
                .upload
                .path
                .as_ref()
                .and_then(|path| path.file_name())
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "No file selected".to_string());
            ui.label(chosen);
        });
        if ui.button("Upload").clicked() {
            let _ = controller.submit_upload();
        }
    });
}

fn render_manual_form(controller: &mut EguiController, ui: &mut Ui) {
    ui.group(|ui| {
        ui.label(RichText::new("Manual entry").strong());
        egui::Grid::new("manual_entry_grid")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                let names: Vec<&'static str> =
                    controller.ui.manual_form.fields().map(|(name, _)| name).collect();
                for name in names {
                    ui.label(name.replace('_', " ").to_uppercase());
                    if let Some(value) = controller.ui.manual_form.value_mut(name) {
                        ui.add(egui::TextEdit::singleline(value).desired_width(220.0));
                    }
                    ui.end_row();
                }
            });
        ui.add_space(6.0);
        if ui.button("Submit").clicked() {
            let _ = controller.submit_manual_entry();
        }
    });
}
