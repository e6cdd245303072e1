//! Conversion of raw field values into plottable numbers.
//!
//! Every numeric cell in the grid and every chart point goes through
//! [`normalize`], so both views agree on what a value means.

use super::FieldValue;

/// Convert a raw field value into a number.
///
/// Numbers pass through unchanged (including `NaN`). Text has every comma
/// removed before the leading decimal number is parsed; text without a
/// numeric prefix yields `NaN`. Missing values and empty text yield `0.0`.
pub fn normalize(value: Option<&FieldValue>) -> f64 {
    match value {
        None | Some(FieldValue::Missing) => 0.0,
        Some(FieldValue::Number(number)) => *number,
        Some(FieldValue::Text(text)) => normalize_text(text),
    }
}

/// Parse thousands-separated text the same way [`normalize`] does.
pub fn normalize_text(text: &str) -> f64 {
    let stripped: String = text.chars().filter(|ch| *ch != ',').collect();
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    parse_leading_float(trimmed).unwrap_or(f64::NAN)
}

/// Parse the longest prefix that forms a decimal number, e.g. `"12.5kg"` -> 12.5.
fn parse_leading_float(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut end = 0usize;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    text[..end].parse::<f64>().ok()
}
