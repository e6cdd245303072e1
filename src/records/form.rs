//! Manual entry form model and its local validation.

use super::{EngineError, FieldValue, normalize::normalize_text, sorted::year_sort_key};

/// Fields submitted for a manually entered record, in display order.
pub const MANUAL_ENTRY_FIELDS: [&str; 10] = [
    "year",
    "company",
    "asset",
    "debt",
    "capital",
    "income",
    "cost",
    "profit",
    "net_income",
    "investment",
];

/// Text echoed by the manual entry inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManualEntryForm {
    values: Vec<(&'static str, String)>,
}

impl Default for ManualEntryForm {
    fn default() -> Self {
        Self {
            values: MANUAL_ENTRY_FIELDS
                .iter()
                .map(|name| (*name, String::new()))
                .collect(),
        }
    }
}

impl ManualEntryForm {
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Mutable access for text inputs.
    pub fn value_mut(&mut self, name: &str) -> Option<&mut String> {
        self.values
            .iter_mut()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        if let Some(slot) = self.value_mut(name) {
            *slot = value.into();
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.values.iter().map(|(key, value)| (*key, value.as_str()))
    }

    /// Reset every input to an empty string.
    pub fn clear(&mut self) {
        for (_, value) in &mut self.values {
            value.clear();
        }
    }

    /// Check required fields and numeric parseability, returning the trimmed submission.
    pub fn validate(&self) -> Result<ManualEntry, EngineError> {
        let mut fields = Vec::with_capacity(self.values.len());
        for (name, raw) in &self.values {
            let value = raw.trim();
            if value.is_empty() {
                return Err(EngineError::Validation(format!("Missing field: {name}")));
            }
            match *name {
                "company" => {}
                "year" => {
                    if year_sort_key(&FieldValue::Text(value.to_string())).is_none() {
                        return Err(EngineError::Validation(format!(
                            "year must be a year (e.g. 2021), got \"{value}\""
                        )));
                    }
                }
                _ => {
                    if !normalize_text(value).is_finite() {
                        return Err(EngineError::Validation(format!(
                            "{name} must be a number, got \"{value}\""
                        )));
                    }
                }
            }
            fields.push((name.to_string(), value.to_string()));
        }
        Ok(ManualEntry { fields })
    }
}

/// A validated manual entry ready to be sent to the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManualEntry {
    pub fields: Vec<(String, String)>,
}

impl ManualEntry {
    /// Fields as a JSON object in submission order.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(key, value)| (key.clone(), serde_json::Value::String(value.clone())))
                .collect(),
        )
    }
}
