//! Company-year records and the derived views rendered by the UI.
//!
//! Records arrive from the remote store as loosely typed JSON objects. This
//! module keeps them in a typed form, exposes the year-sorted view and the
//! feature list, and hosts the pure helpers that turn them into chart series.

pub mod form;
pub mod normalize;
pub mod selection;
pub mod series;
pub mod sorted;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use normalize::normalize;
pub use series::{ChartSeries, Dataset, FeatureSelector, SeriesColor, build_series};
pub use sorted::{SortedView, feature_list};

/// Key holding the store-assigned identifier.
pub const ID_KEY: &str = "id";
/// Key holding the observation year; used as the sort key.
pub const YEAR_KEY: &str = "year";
/// Key holding the company label.
pub const COMPANY_KEY: &str = "company";

/// Opaque identifier assigned by the remote store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// Read an id from JSON; `null` and non-scalar values yield `None`.
    ///
    /// Integral floats (`3.0`) are the same id as the integer. Other numbers
    /// keep their text so the row stays selectable.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    return Some(Self::Int(int));
                }
                match number.as_f64() {
                    Some(float)
                        if number.is_f64()
                            && float.fract() == 0.0
                            && float >= i64::MIN as f64
                            && float < i64::MAX as f64 =>
                    {
                        Some(Self::Int(float as i64))
                    }
                    _ => Some(Self::Text(number.to_string())),
                }
            }
            Value::String(text) => Some(Self::Text(text.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// A raw field value as delivered by the store.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Missing,
}

impl FieldValue {
    /// Convert a JSON value, treating `null` and non-scalar values as missing.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(number) => number
                .as_f64()
                .map(Self::Number)
                .unwrap_or(Self::Missing),
            Value::String(text) => Self::Text(text.clone()),
            Value::Bool(flag) => Self::Number(if *flag { 1.0 } else { 0.0 }),
            Value::Null | Value::Array(_) | Value::Object(_) => Self::Missing,
        }
    }

    /// Text shown in grid cells and chart labels.
    pub fn display(&self) -> String {
        match self {
            Self::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                format!("{}", *value as i64)
            }
            Self::Number(value) => value.to_string(),
            Self::Text(text) => text.clone(),
            Self::Missing => String::new(),
        }
    }
}

/// One company-year observation.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub id: Option<RecordId>,
    pub year: FieldValue,
    pub company: String,
    /// Remaining fields in wire order.
    pub fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Build a record from a JSON object, preserving the key order.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let mut id = None;
        let mut year = FieldValue::Missing;
        let mut company = String::new();
        let mut fields = Vec::with_capacity(object.len());
        for (key, value) in object {
            match key.as_str() {
                ID_KEY => id = RecordId::from_json(value),
                YEAR_KEY => year = FieldValue::from_json(value),
                COMPANY_KEY => company = FieldValue::from_json(value).display(),
                _ => fields.push((key.clone(), FieldValue::from_json(value))),
            }
        }
        Self {
            id,
            year,
            company,
            fields,
        }
    }

    /// Look up a named field; `year` and `company` are not fields.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Field names in wire order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    /// Display label for the record's year.
    pub fn year_label(&self) -> String {
        self.year.display()
    }
}

/// The three failure classes surfaced to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    Mutation,
    Validation,
}

/// User-facing engine failure. None of these are fatal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Reading records or the prediction failed; stale data stays visible.
    #[error("{0}")]
    Fetch(String),
    /// Insert, upload or delete failed; local state is unchanged.
    #[error("{0}")]
    Mutation(String),
    /// Rejected locally before any network call.
    #[error("{0}")]
    Validation(String),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Fetch(_) => ErrorKind::Fetch,
            Self::Mutation(_) => ErrorKind::Mutation,
            Self::Validation(_) => ErrorKind::Validation,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Fetch(message) | Self::Mutation(message) | Self::Validation(message) => message,
        }
    }
}
