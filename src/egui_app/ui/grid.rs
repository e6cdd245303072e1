use eframe::egui::{self, Button, RichText, Ui};

use super::style;
use crate::egui_app::controller::EguiController;
use crate::egui_app::state::{GridColumn, SortDirection};

pub(super) fn render_grid(controller: &mut EguiController, ui: &mut Ui) {
    let page = controller.grid_page();
    ui.horizontal(|ui| {
        ui.label("Filter");
        let mut filter = controller.ui.grid.filter.clone();
        if ui
            .add(egui::TextEdit::singleline(&mut filter).desired_width(220.0))
            .changed()
        {
            controller.set_grid_filter(filter);
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let delete = Button::new(RichText::new("Delete selected").color(egui::Color32::WHITE))
                .fill(style::delete_button_fill());
            if ui.add(delete).clicked() {
                let _ = controller.delete_selected();
            }
            ui.label(format!("{} selected", controller.selection().len()));
        });
    });
    ui.add_space(6.0);

    if page.total_rows == 0 {
        ui.label(RichText::new("No records").color(style::palette().text_muted));
        return;
    }

    egui::ScrollArea::horizontal()
        .id_salt("grid_scroll")
        .show(ui, |ui| {
            egui::Grid::new("records_grid")
                .striped(true)
                .spacing([16.0, 6.0])
                .show(ui, |ui| {
                    let mut all = page.all_selected();
                    let selectable = page.selectable_indices();
                    if ui
                        .add_enabled(!selectable.is_empty(), egui::Checkbox::without_text(&mut all))
                        .changed()
                    {
                        controller.set_rows_selected(&selectable, all);
                    }
                    for column in &page.columns {
                        if ui
                            .add(Button::new(header_text(controller, column)).frame(false))
                            .clicked()
                        {
                            controller.toggle_grid_sort(column.clone());
                        }
                    }
                    ui.end_row();

                    for row in &page.rows {
                        let mut checked = row.selected;
                        if ui
                            .add_enabled(row.selectable, egui::Checkbox::without_text(&mut checked))
                            .changed()
                        {
                            controller.toggle_row_selection(row.index);
                        }
                        for cell in &row.cells {
                            ui.label(cell);
                        }
                        ui.end_row();
                    }
                });
        });

    ui.horizontal(|ui| {
        if ui
            .add_enabled(page.page > 0, Button::new("◀"))
            .clicked()
        {
            controller.set_grid_page(page.page - 1);
        }
        ui.label(format!(
            "Page {} of {} ({} rows)",
            page.page + 1,
            page.page_count,
            page.total_rows
        ));
        if ui
            .add_enabled(page.page + 1 < page.page_count, Button::new("▶"))
            .clicked()
        {
            controller.set_grid_page(page.page + 1);
        }
    });
}

fn header_text(controller: &EguiController, column: &GridColumn) -> RichText {
    let arrow = match &controller.ui.grid.sort {
        Some(sort) if &sort.column == column => match sort.direction {
            SortDirection::Ascending => " ▲",
            SortDirection::Descending => " ▼",
        },
        _ => "",
    };
    RichText::new(format!("{}{arrow}", column.header())).strong()
}
