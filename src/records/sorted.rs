//! Year-ordered view over a fetched record set.

use std::cmp::Ordering;

use time::{Date, Month, format_description::BorrowedFormatItem, macros::format_description};

use super::{FieldValue, Record};

const YEAR_MONTH_DAY: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Records ordered ascending by parsed year, plus the features they expose.
///
/// The view owns its records; it is rebuilt from scratch whenever the
/// underlying set changes and never edited in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SortedView {
    records: Vec<Record>,
    features: Vec<String>,
}

impl SortedView {
    /// Sort a freshly fetched set and derive its feature list.
    pub fn from_records(mut records: Vec<Record>) -> Self {
        let features = feature_list(&records);
        // Stable: equal years keep fetch order.
        records.sort_by(|a, b| compare_years(&a.year, &b.year));
        Self { records, features }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Year labels in view order.
    pub fn labels(&self) -> Vec<String> {
        self.records.iter().map(Record::year_label).collect()
    }
}

/// Feature names taken from the first record only.
///
/// Later records with extra or missing keys do not change the list.
pub fn feature_list(records: &[Record]) -> Vec<String> {
    records
        .first()
        .map(|record| record.field_names().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Date-comparable key for a year value; `None` when it cannot be read.
pub fn year_sort_key(value: &FieldValue) -> Option<Date> {
    match value {
        FieldValue::Number(year) if year.is_finite() && year.fract() == 0.0 => {
            calendar_year(*year as i64)
        }
        FieldValue::Number(_) | FieldValue::Missing => None,
        FieldValue::Text(text) => parse_year_text(text.trim()),
    }
}

/// Ascending order by year key; unreadable years sort last.
pub fn compare_years(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (year_sort_key(a), year_sort_key(b)) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn parse_year_text(text: &str) -> Option<Date> {
    match text.len() {
        4 => text.parse::<i64>().ok().and_then(calendar_year),
        7 => Date::parse(&format!("{text}-01"), YEAR_MONTH_DAY).ok(),
        10 => Date::parse(text, YEAR_MONTH_DAY).ok(),
        _ => None,
    }
}

fn calendar_year(year: i64) -> Option<Date> {
    let year = i32::try_from(year).ok()?;
    Date::from_calendar_date(year, Month::January, 1).ok()
}
