use super::*;
use crate::config::GraphType;
use crate::egui_app::state::{EntryForm, GridColumn};
use crate::records::FeatureSelector;

impl EguiController {
    pub fn select_entry_form(&mut self, form: EntryForm) {
        self.ui.view.select_form(form);
    }

    /// Switch between line and bar charts for this session.
    pub fn set_graph_type(&mut self, graph_type: GraphType) {
        self.ui.chart.graph_type = graph_type;
    }

    pub fn set_feature_selector(&mut self, selector: FeatureSelector) {
        self.ui.chart.selector = selector;
    }

    pub fn set_grid_filter(&mut self, filter: impl Into<String>) {
        self.ui.grid.filter = filter.into();
        self.ui.grid.page = 0;
    }

    pub fn toggle_grid_sort(&mut self, column: GridColumn) {
        self.ui.grid.cycle_sort(column);
    }

    /// Jump to a grid page, clamped to the last page.
    pub fn set_grid_page(&mut self, page: usize) {
        let rows = view_model::visible_rows(&self.records, &self.ui.grid).len();
        let last = view_model::page_count(rows, self.ui.grid.page_size) - 1;
        self.ui.grid.page = page.min(last);
    }
}
