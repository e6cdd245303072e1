//! Engine controller: owns the record set, selection, prediction and view
//! flags, and bridges them to the egui renderer.

mod deletion;
mod jobs;
mod prediction;
mod record_store;
mod view_state;

#[cfg(test)]
mod test_support;

use crate::config::{AppConfig, ConfigError};
use crate::egui_app::state::UiState;
use crate::egui_app::ui::style::StatusTone;
use crate::egui_app::view_model;
use crate::record_service::{PredictionResult, RecordService};
use crate::records::selection::SelectionSet;
use crate::records::{ChartSeries, EngineError, SortedView, build_series};
use jobs::{ControllerJobs, JobOutcome};
use std::sync::Arc;

pub use jobs::{JobKind, RequestToken};

/// Maintains engine state and bridges it to the egui UI.
///
/// Remote calls run on worker threads; their results are applied in
/// [`EguiController::poll_jobs`], so every mutation happens on the UI thread.
pub struct EguiController {
    pub ui: UiState,
    service: Arc<dyn RecordService>,
    config: AppConfig,
    records: SortedView,
    selection: SelectionSet,
    jobs: ControllerJobs,
    failed_job: Option<JobKind>,
}

impl EguiController {
    pub fn new(service: Arc<dyn RecordService>, config: AppConfig) -> Self {
        let mut ui = UiState::default();
        ui.grid.page_size = config.grid.page_size;
        ui.chart.graph_type = config.chart.graph_type;
        Self {
            ui,
            service,
            config,
            records: SortedView::default(),
            selection: SelectionSet::default(),
            jobs: ControllerJobs::new(),
            failed_job: None,
        }
    }

    /// Build a controller talking HTTP to the configured record store.
    ///
    /// The config only seeds startup defaults; UI choices live for the session.
    pub fn from_config(config: AppConfig) -> Result<Self, ConfigError> {
        let service = config.service.build_service()?;
        Ok(Self::new(Arc::new(service), config))
    }

    /// Initial load, issued once when the window opens.
    pub fn start(&mut self) {
        self.set_status("Loading records", StatusTone::Busy);
        self.refresh_records();
    }

    /// Apply finished background jobs. Call once per frame.
    pub fn poll_jobs(&mut self) {
        loop {
            let message = match self.jobs.try_recv_message() {
                Ok(message) => message,
                Err(
                    std::sync::mpsc::TryRecvError::Empty
                    | std::sync::mpsc::TryRecvError::Disconnected,
                ) => break,
            };
            let latest = self.jobs.finish(message.token);
            match message.outcome {
                JobOutcome::Fetched(result) => self.apply_fetch(message.token, latest, result),
                JobOutcome::Inserted(result) => self.apply_insert(result),
                JobOutcome::Uploaded(result) => self.apply_upload(result),
                JobOutcome::Deleted(result) => self.apply_delete(result),
                JobOutcome::Predicted(result) => {
                    self.apply_prediction(message.token, latest, result)
                }
            }
        }
        self.sync_loading();
    }

    pub fn sorted_view(&self) -> &SortedView {
        &self.records
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn is_loading(&self) -> bool {
        self.ui.view.loading
    }

    pub fn jobs_in_flight(&self, kind: JobKind) -> usize {
        self.jobs.in_flight(kind)
    }

    pub fn prediction(&self) -> Option<&PredictionResult> {
        self.ui.prediction.as_ref()
    }

    pub fn last_error(&self) -> Option<&EngineError> {
        self.ui.view.last_error.as_ref()
    }

    /// Operation behind the current error flag.
    pub fn failed_job(&self) -> Option<JobKind> {
        self.failed_job
    }

    /// Re-issue the operation that raised the current error.
    ///
    /// Mutations reuse what the failure left in place: the manual form, the
    /// chosen upload file and the selection.
    pub fn retry_failed(&mut self) {
        let Some(kind) = self.failed_job else {
            return;
        };
        self.clear_error();
        let retried = match kind {
            JobKind::Fetch => Ok(self.refresh_records()),
            JobKind::Prediction => Ok(self.request_prediction()),
            JobKind::Insert => self.submit_manual_entry(),
            JobKind::Upload => self.submit_upload(),
            JobKind::Delete => self.delete_selected(),
        };
        if let Err(err) = retried {
            tracing::debug!("Retry of {kind:?} rejected locally: {err}");
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Chart series for the current view and feature selector.
    ///
    /// Built fresh on every call; the graph type does not influence the output.
    pub fn chart_series(&self) -> ChartSeries {
        build_series(&self.records, self.records.features(), &self.ui.chart.selector)
    }

    /// Grid rows for the current filter, sort and page.
    pub fn grid_page(&self) -> view_model::GridPage {
        view_model::grid_page(&self.records, &self.ui.grid, &self.selection)
    }

    pub fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.ui.status.set(text, tone);
    }

    fn spawn_job<F>(&mut self, kind: JobKind, work: F) -> RequestToken
    where
        F: FnOnce(&dyn RecordService) -> JobOutcome + Send + 'static,
    {
        let token = self.jobs.spawn(kind, Arc::clone(&self.service), work);
        self.sync_loading();
        token
    }

    fn sync_loading(&mut self) {
        self.ui.view.loading = self.jobs.any_in_flight();
    }

    /// Record a remote failure as the shared error flag and in the status bar.
    fn report_error(&mut self, kind: JobKind, error: EngineError) {
        self.set_status(error.message().to_string(), StatusTone::Error);
        self.ui.view.set_error(error);
        self.failed_job = Some(kind);
    }

    fn clear_error(&mut self) {
        self.ui.view.clear_error();
        self.failed_job = None;
    }

    /// Surface a local validation failure; the shared error flag is untouched.
    fn report_validation(&mut self, error: &EngineError) {
        self.set_status(error.message().to_string(), StatusTone::Warning);
    }
}
