use super::jobs::{JobKind, JobOutcome, RequestToken};
use super::*;
use crate::record_service::{ServiceError, UploadFile};
use crate::records::{FeatureSelector, Record};
use rfd::FileDialog;
use std::path::{Path, PathBuf};

const FETCH_FAILED: &str = "Failed to fetch uploaded data.";
const INSERT_FAILED: &str = "Failed to insert data.";
const UPLOAD_FAILED: &str = "Failed to upload the file.";
const UPLOAD_MISSING: &str = "Please upload a file";
const UPLOAD_SUCCEEDED: &str = "File uploaded successfully";
const INSERT_SUCCEEDED: &str = "Data inserted successfully";

impl EguiController {
    /// Reload the full record set from the remote store.
    ///
    /// Clears the shared error flag. The previous set stays visible until a
    /// newer fetch succeeds.
    pub fn refresh_records(&mut self) -> RequestToken {
        self.clear_error();
        self.spawn_job(JobKind::Fetch, |service| {
            JobOutcome::Fetched(service.fetch_records())
        })
    }

    /// Validate the manual form and submit it as one record.
    ///
    /// The form is cleared only after the store accepts the record.
    pub fn submit_manual_entry(&mut self) -> Result<RequestToken, EngineError> {
        let entry = match self.ui.manual_form.validate() {
            Ok(entry) => entry,
            Err(err) => {
                self.report_validation(&err);
                return Err(err);
            }
        };
        self.clear_error();
        self.set_status("Submitting record", StatusTone::Busy);
        Ok(self.spawn_job(JobKind::Insert, move |service| {
            JobOutcome::Inserted(service.insert_record(&entry))
        }))
    }

    /// Ask the user for a spreadsheet to upload.
    pub fn choose_upload_file(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter("Spreadsheet", &["xlsx", "xls", "csv"])
            .pick_file()
        else {
            return;
        };
        self.set_upload_file(Some(path));
    }

    pub fn set_upload_file(&mut self, path: Option<PathBuf>) {
        self.ui.upload.path = path;
    }

    /// Send the chosen file to the store for server-side parsing.
    pub fn submit_upload(&mut self) -> Result<RequestToken, EngineError> {
        let file = match self.ui.upload.path.as_deref().map(read_upload_file) {
            Some(Ok(file)) => file,
            Some(Err(err)) => {
                self.report_validation(&err);
                return Err(err);
            }
            None => {
                let err = EngineError::Validation(UPLOAD_MISSING.to_string());
                self.report_validation(&err);
                return Err(err);
            }
        };
        self.set_status(format!("Uploading {}", file.file_name), StatusTone::Busy);
        Ok(self.spawn_job(JobKind::Upload, move |service| {
            JobOutcome::Uploaded(service.upload_file(&file))
        }))
    }

    pub(super) fn apply_fetch(
        &mut self,
        token: RequestToken,
        latest: bool,
        result: Result<Vec<Record>, ServiceError>,
    ) {
        if !latest {
            tracing::debug!("Discarding superseded fetch #{}", token.seq);
            return;
        }
        match result {
            Ok(records) => {
                tracing::info!("Fetched {} records", records.len());
                self.replace_records(records);
                let count = self.records.len();
                self.set_status(format!("{count} records loaded"), StatusTone::Info);
            }
            Err(err) => {
                tracing::warn!("Record fetch failed: {err}");
                self.report_error(
                    JobKind::Fetch,
                    EngineError::Fetch(FETCH_FAILED.to_string()),
                );
            }
        }
    }

    pub(super) fn apply_insert(&mut self, result: Result<String, ServiceError>) {
        match result {
            Ok(message) => {
                tracing::info!("Record inserted");
                self.ui.manual_form.clear();
                self.set_status(notice_or(message, INSERT_SUCCEEDED), StatusTone::Info);
                self.refresh_records();
            }
            Err(err) => {
                tracing::warn!("Insert failed: {err}");
                self.report_error(JobKind::Insert, mutation_error(&err, INSERT_FAILED));
            }
        }
    }

    pub(super) fn apply_upload(&mut self, result: Result<String, ServiceError>) {
        match result {
            Ok(message) => {
                tracing::info!("Upload accepted");
                self.set_status(notice_or(message, UPLOAD_SUCCEEDED), StatusTone::Info);
                self.refresh_records();
            }
            Err(err) => {
                tracing::warn!("Upload failed: {err}");
                self.report_error(JobKind::Upload, mutation_error(&err, UPLOAD_FAILED));
            }
        }
    }

    fn replace_records(&mut self, records: Vec<Record>) {
        self.records = SortedView::from_records(records);
        self.selection.retain_present(self.records.records());
        if let FeatureSelector::Feature(name) = &self.ui.chart.selector
            && !self.records.features().iter().any(|feature| feature == name)
        {
            self.ui.chart.selector = FeatureSelector::All;
        }
        let pages = view_model::page_count(
            view_model::visible_rows(&self.records, &self.ui.grid).len(),
            self.ui.grid.page_size,
        );
        self.ui.grid.page = self.ui.grid.page.min(pages - 1);
    }
}

fn read_upload_file(path: &Path) -> Result<UploadFile, EngineError> {
    let bytes = std::fs::read(path).map_err(|err| {
        EngineError::Validation(format!("Could not read {}: {err}", path.display()))
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.xlsx".to_string());
    Ok(UploadFile { file_name, bytes })
}

fn notice_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

/// Prefer the server's explanation, fall back to a generic message.
pub(super) fn mutation_error(err: &ServiceError, fallback: &str) -> EngineError {
    EngineError::Mutation(
        err.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string()),
    )
}
