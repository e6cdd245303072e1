use super::jobs::{JobKind, JobOutcome, RequestToken};
use super::*;
use crate::record_service::{DeleteOutcome, ServiceError};
use crate::records::RecordId;
use crate::records::selection::filter_selection;

const DELETE_FAILED: &str = "Failed to delete rows.";
const DELETE_SUCCEEDED: &str = "Selected rows deleted successfully.";

impl EguiController {
    /// Toggle selection of the row at `index` in the sorted view.
    ///
    /// Rows without an id cannot be selected.
    pub fn toggle_row_selection(&mut self, index: usize) {
        if let Some(record) = self.records.records().get(index) {
            self.selection.toggle(record.id.as_ref());
        }
    }

    /// Select or deselect several rows at once (header checkbox).
    pub fn set_rows_selected(&mut self, indices: &[usize], selected: bool) {
        for index in indices {
            if let Some(record) = self.records.records().get(*index) {
                self.selection.set(record.id.as_ref(), selected);
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Delete every selected row in one batch request.
    pub fn delete_selected(&mut self) -> Result<RequestToken, EngineError> {
        let candidates: Vec<Option<RecordId>> = self.selection.ids().cloned().map(Some).collect();
        self.delete_rows(&candidates)
    }

    /// Delete the given candidate ids; null entries are dropped first.
    ///
    /// An empty list after filtering fails locally without a network call.
    pub fn delete_rows(
        &mut self,
        candidates: &[Option<RecordId>],
    ) -> Result<RequestToken, EngineError> {
        let ids = match filter_selection(candidates.iter().map(Option::as_ref)) {
            Ok(ids) => ids,
            Err(err) => {
                self.report_validation(&err);
                return Err(err);
            }
        };
        tracing::info!("Deleting {} records", ids.len());
        self.set_status(format!("Deleting {} rows", ids.len()), StatusTone::Busy);
        Ok(self.spawn_job(JobKind::Delete, move |service| {
            JobOutcome::Deleted(service.delete_records(&ids))
        }))
    }

    pub(super) fn apply_delete(&mut self, result: Result<DeleteOutcome, ServiceError>) {
        match result {
            Ok(outcome) if outcome.success => {
                tracing::info!("Delete succeeded");
                self.selection.clear();
                let notice = if outcome.message.trim().is_empty() {
                    DELETE_SUCCEEDED.to_string()
                } else {
                    outcome.message
                };
                self.set_status(notice, StatusTone::Info);
                self.refresh_records();
            }
            Ok(outcome) => {
                // Logical failure: the store changed nothing, so neither do we.
                tracing::warn!("Delete rejected: {}", outcome.message);
                let notice = if outcome.message.is_empty() {
                    DELETE_FAILED.to_string()
                } else {
                    outcome.message
                };
                self.set_status(notice, StatusTone::Warning);
            }
            Err(err) => {
                tracing::warn!("Delete failed: {err}");
                self.report_error(
                    JobKind::Delete,
                    EngineError::Mutation(DELETE_FAILED.to_string()),
                );
            }
        }
    }
}
