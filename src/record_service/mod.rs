//! Remote record store: the only source of truth for records and predictions.

pub mod api;
mod multipart;

use serde::{Deserialize, Serialize};

use crate::records::{Record, RecordId, form::ManualEntry};

pub use api::{HttpRecordService, ManualEntryEncoding};

/// Probability/verdict pair computed by the remote model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_probability: f64,
    pub is_unicorn: bool,
}

/// Reply to a batch delete. `success == false` is a logical failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Opaque spreadsheet payload for bulk upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Failures talking to the record store.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Transport(String),
    #[error("Server returned {code}: {message}")]
    Status { code: u16, message: String },
    #[error("{0}")]
    Rejected(String),
    #[error("JSON error: {0}")]
    Json(String),
}

impl ServiceError {
    /// Whether retrying an idempotent request could help.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { code, .. } => *code >= 500,
            Self::Rejected(_) | Self::Json(_) => false,
        }
    }

    /// Message reported by the server, if it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } | Self::Rejected(message) if !message.is_empty() => {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}

/// Request/response contract of the record store.
///
/// Calls block; the controller runs them on worker threads.
pub trait RecordService: Send + Sync {
    fn fetch_records(&self) -> Result<Vec<Record>, ServiceError>;
    fn insert_record(&self, entry: &ManualEntry) -> Result<String, ServiceError>;
    fn upload_file(&self, file: &UploadFile) -> Result<String, ServiceError>;
    fn delete_records(&self, ids: &[RecordId]) -> Result<DeleteOutcome, ServiceError>;
    fn fetch_prediction(&self) -> Result<PredictionResult, ServiceError>;
}
