//! HTTP client for the record store service.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::{DeleteOutcome, PredictionResult, RecordService, ServiceError, UploadFile, multipart};
use crate::http_client::{self, Reply, RetryConfig, read_reply};
use crate::records::{Record, RecordId, form::ManualEntry};

pub const FETCH_RECORDS_PATH: &str = "fetch_uploaded_data";
pub const INSERT_RECORD_PATH: &str = "insert_data";
pub const UPLOAD_FILE_PATH: &str = "insert_new_excel";
pub const DELETE_ROWS_PATH: &str = "delete_rows";
pub const PREDICT_PATH: &str = "predict";

const MAX_RECORDS_RESPONSE_BYTES: usize = 16 * 1024 * 1024;
const MAX_RESPONSE_BYTES: usize = 256 * 1024;
const MAX_ERROR_SNIPPET_CHARS: usize = 200;

/// How manual entries are encoded on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManualEntryEncoding {
    #[default]
    Json,
    Form,
}

/// [`RecordService`] backed by the shared ureq agent.
#[derive(Clone, Debug)]
pub struct HttpRecordService {
    base_url: Url,
    retry: RetryConfig,
    entry_encoding: ManualEntryEncoding,
}

impl HttpRecordService {
    /// Create a client for `base_url` (e.g. `http://127.0.0.1:5001`).
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            retry: RetryConfig {
                max_attempts: 3,
                base_delay: Duration::from_millis(250),
                max_delay: Duration::from_secs(2),
            },
            entry_encoding: ManualEntryEncoding::Json,
        })
    }

    /// Override the retry policy used for GET requests.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_entry_encoding(mut self, encoding: ManualEntryEncoding) -> Self {
        self.entry_encoding = encoding;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        self.base_url
            .join(path)
            .map_err(|err| ServiceError::Transport(format!("Invalid endpoint {path}: {err}")))
    }

    fn get_text(&self, path: &str, max_bytes: usize) -> Result<String, ServiceError> {
        let url = self.endpoint(path)?;
        self.retry.run(|| {
            tracing::debug!("GET {url}");
            let result = http_client::agent()
                .get(url.as_str())
                .set("Accept", "application/json")
                .call();
            match read_reply(result, max_bytes)? {
                Reply::Success(body) => Ok(body),
                Reply::Failure { code, body } => Err(status_error(code, &body)),
            }
        })
    }

    fn post_request(&self, path: &str) -> Result<ureq::Request, ServiceError> {
        let url = self.endpoint(path)?;
        tracing::debug!("POST {url}");
        Ok(http_client::agent()
            .post(url.as_str())
            .set("Accept", "application/json"))
    }
}

impl RecordService for HttpRecordService {
    fn fetch_records(&self) -> Result<Vec<Record>, ServiceError> {
        let body = self.get_text(FETCH_RECORDS_PATH, MAX_RECORDS_RESPONSE_BYTES)?;
        parse_records(&body)
    }

    fn insert_record(&self, entry: &ManualEntry) -> Result<String, ServiceError> {
        let request = self.post_request(INSERT_RECORD_PATH)?;
        let result = match self.entry_encoding {
            ManualEntryEncoding::Json => request.send_json(entry.to_json()),
            ManualEntryEncoding::Form => {
                let pairs: Vec<(&str, &str)> = entry
                    .fields
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str()))
                    .collect();
                request.send_form(&pairs)
            }
        };
        match read_reply(result, MAX_RESPONSE_BYTES)? {
            Reply::Success(body) => parse_message(&body),
            Reply::Failure { code, body } => Err(status_error(code, &body)),
        }
    }

    fn upload_file(&self, file: &UploadFile) -> Result<String, ServiceError> {
        let body = multipart::single_file(file);
        let result = self
            .post_request(UPLOAD_FILE_PATH)?
            .set("Content-Type", &body.content_type)
            .send_bytes(&body.bytes);
        match read_reply(result, MAX_RESPONSE_BYTES)? {
            Reply::Success(body) => parse_message(&body),
            Reply::Failure { code, body } => Err(status_error(code, &body)),
        }
    }

    fn delete_records(&self, ids: &[RecordId]) -> Result<DeleteOutcome, ServiceError> {
        let result = self
            .post_request(DELETE_ROWS_PATH)?
            .send_json(DeleteRequest { ids });
        match read_reply(result, MAX_RESPONSE_BYTES)? {
            Reply::Success(body) => parse_delete_outcome(&body),
            Reply::Failure { code, body } => match parse_delete_outcome(&body) {
                // The store reports "nothing deleted" with an error status but a normal body.
                Ok(outcome) if !outcome.success && !outcome.message.is_empty() => Ok(outcome),
                _ => Err(status_error(code, &body)),
            },
        }
    }

    fn fetch_prediction(&self) -> Result<PredictionResult, ServiceError> {
        let body = self.get_text(PREDICT_PATH, MAX_RESPONSE_BYTES)?;
        parse_prediction(&body)
    }
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    ids: &'a [RecordId],
}

fn status_error(code: u16, body: &str) -> ServiceError {
    ServiceError::Status {
        code,
        message: error_message(body).unwrap_or_else(|| snippet(body)),
    }
}

/// Pull `error` (or `message`) out of a JSON error body.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body.trim()).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

fn snippet(body: &str) -> String {
    body.trim().chars().take(MAX_ERROR_SNIPPET_CHARS).collect()
}

fn parse_json(body: &str) -> Result<Value, ServiceError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Json("Empty response body".to_string()));
    }
    serde_json::from_str(trimmed).map_err(|err| ServiceError::Json(format!("{err}: {}", snippet(trimmed))))
}

fn rejection(value: &Value) -> Option<ServiceError> {
    value
        .get("error")
        .and_then(Value::as_str)
        .map(|message| ServiceError::Rejected(message.to_string()))
}

pub(crate) fn parse_records(body: &str) -> Result<Vec<Record>, ServiceError> {
    let value = parse_json(body)?;
    if let Some(err) = rejection(&value) {
        return Err(err);
    }
    match value.get("data") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(rows)) => rows
            .iter()
            .map(|row| {
                row.as_object()
                    .map(Record::from_json_object)
                    .ok_or_else(|| ServiceError::Json(format!("Record is not an object: {row}")))
            })
            .collect(),
        Some(other) => Err(ServiceError::Json(format!(
            "Expected `data` to be an array, got {other}"
        ))),
    }
}

pub(crate) fn parse_message(body: &str) -> Result<String, ServiceError> {
    if body.trim().is_empty() {
        return Ok(String::new());
    }
    let value = parse_json(body)?;
    if let Some(err) = rejection(&value) {
        return Err(err);
    }
    Ok(value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string())
}

pub(crate) fn parse_delete_outcome(body: &str) -> Result<DeleteOutcome, ServiceError> {
    let value = parse_json(body)?;
    serde_json::from_value(value).map_err(|err| ServiceError::Json(err.to_string()))
}

pub(crate) fn parse_prediction(body: &str) -> Result<PredictionResult, ServiceError> {
    let value = parse_json(body)?;
    if let Some(err) = rejection(&value) {
        return Err(err);
    }
    serde_json::from_value(value).map_err(|err| ServiceError::Json(err.to_string()))
}
