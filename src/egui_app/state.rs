//! Shared state types for the egui UI.

use crate::config::GraphType;
use crate::egui_app::ui::style::{self, StatusTone};
use crate::records::{EngineError, FeatureSelector, form::ManualEntryForm};
use crate::record_service::PredictionResult;
use egui::Color32;
use std::path::PathBuf;

/// Number of status messages kept in the rolling log.
pub const STATUS_LOG_LIMIT: usize = 50;

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub status: StatusBarState,
    pub view: ViewState,
    pub grid: GridState,
    pub chart: ChartState,
    pub manual_form: ManualEntryForm,
    pub upload: UploadFormState,
    /// Latest prediction; stays visible when a later request fails.
    pub prediction: Option<PredictionResult>,
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub tone: StatusTone,
    pub badge_label: String,
    pub badge_color: Color32,
    /// Rolling status log, oldest first.
    pub log: Vec<String>,
}

impl Default for StatusBarState {
    fn default() -> Self {
        Self::idle()
    }
}

impl StatusBarState {
    pub fn idle() -> Self {
        Self {
            text: "Connecting to the record store".into(),
            tone: StatusTone::Idle,
            badge_label: style::status_badge_label(StatusTone::Idle).into(),
            badge_color: style::status_badge_color(StatusTone::Idle),
            log: Vec::new(),
        }
    }

    /// Replace the current message and append it to the log.
    pub fn set(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.text = text.into();
        self.tone = tone;
        self.badge_label = style::status_badge_label(tone).into();
        self.badge_color = style::status_badge_color(tone);
        self.log.push(self.text.clone());
        if self.log.len() > STATUS_LOG_LIMIT {
            let excess = self.log.len() - STATUS_LOG_LIMIT;
            self.log.drain(..excess);
        }
    }

    pub fn log_text(&self) -> String {
        self.log.join("\n")
    }
}

/// Which entry form is open above the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EntryForm {
    #[default]
    None,
    Upload,
    Manual,
}

/// Panel visibility plus the loading/error indicators shared by every async operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    pub entry_form: EntryForm,
    pub visualization_visible: bool,
    /// True while any remote call is in flight; drives the single spinner.
    pub loading: bool,
    /// Most recent fetch or mutation failure.
    pub last_error: Option<EngineError>,
}

impl ViewState {
    /// Open one entry form; the other closes.
    pub fn select_form(&mut self, form: EntryForm) {
        self.entry_form = form;
    }

    /// Reveal the chart/prediction panel. It never hides again.
    pub fn show_visualization(&mut self) {
        self.visualization_visible = true;
    }

    pub fn set_error(&mut self, error: EngineError) {
        self.last_error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }
}

/// A sortable grid column.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GridColumn {
    Year,
    Company,
    Feature(String),
}

impl GridColumn {
    pub fn header(&self) -> String {
        match self {
            Self::Year => "YEAR".into(),
            Self::Company => "COMPANY".into(),
            Self::Feature(name) => name.to_uppercase(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Active grid sort column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridSort {
    pub column: GridColumn,
    pub direction: SortDirection,
}

/// Presentation-only grid settings; never affects the sorted view or series.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridState {
    pub filter: String,
    pub sort: Option<GridSort>,
    pub page: usize,
    pub page_size: usize,
}

impl Default for GridState {
    fn default() -> Self {
        Self {
            filter: String::new(),
            sort: None,
            page: 0,
            page_size: 10,
        }
    }
}

impl GridState {
    /// Cycle a column through ascending, descending and unsorted.
    pub fn cycle_sort(&mut self, column: GridColumn) {
        self.sort = match self.sort.take() {
            Some(sort) if sort.column == column => match sort.direction {
                SortDirection::Ascending => Some(GridSort {
                    column,
                    direction: SortDirection::Descending,
                }),
                SortDirection::Descending => None,
            },
            _ => Some(GridSort {
                column,
                direction: SortDirection::Ascending,
            }),
        };
        self.page = 0;
    }
}

/// Chart controls.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChartState {
    pub graph_type: GraphType,
    pub selector: FeatureSelector,
}

/// Bulk upload form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadFormState {
    pub path: Option<PathBuf>,
}
