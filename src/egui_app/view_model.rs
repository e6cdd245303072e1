//! Helpers to turn engine state into render-ready rows, points and text.

use std::cmp::Ordering;

use crate::egui_app::state::{GridColumn, GridState, SortDirection};
use crate::record_service::PredictionResult;
use crate::records::selection::SelectionSet;
use crate::records::sorted::compare_years;
use crate::records::{Dataset, Record, SortedView, normalize};

/// Columns shown in the grid: year, company, then each feature.
pub fn grid_columns(features: &[String]) -> Vec<GridColumn> {
    let mut columns = vec![GridColumn::Year, GridColumn::Company];
    columns.extend(features.iter().cloned().map(GridColumn::Feature));
    columns
}

pub fn cell_text(record: &Record, column: &GridColumn) -> String {
    match column {
        GridColumn::Year => record.year_label(),
        GridColumn::Company => record.company.clone(),
        GridColumn::Feature(name) => record
            .field(name)
            .map(|value| value.display())
            .unwrap_or_default(),
    }
}

/// Indices into the sorted view that pass the grid filter, in grid order.
///
/// Grid sorting is presentation only; the sorted view itself is untouched.
pub fn visible_rows(view: &SortedView, grid: &GridState) -> Vec<usize> {
    let columns = grid_columns(view.features());
    let needle = grid.filter.trim().to_lowercase();
    let records = view.records();
    let mut rows: Vec<usize> = (0..records.len())
        .filter(|index| {
            needle.is_empty()
                || columns.iter().any(|column| {
                    cell_text(&records[*index], column)
                        .to_lowercase()
                        .contains(&needle)
                })
        })
        .collect();
    if let Some(sort) = &grid.sort {
        rows.sort_by(|a, b| {
            let ordering = compare_cells(&records[*a], &records[*b], &sort.column);
            match sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }
    rows
}

fn compare_cells(a: &Record, b: &Record, column: &GridColumn) -> Ordering {
    match column {
        GridColumn::Year => compare_years(&a.year, &b.year),
        GridColumn::Company => a.company.to_lowercase().cmp(&b.company.to_lowercase()),
        GridColumn::Feature(name) => {
            let left = normalize(a.field(name));
            let right = normalize(b.field(name));
            // NaN sorts after every number.
            left.partial_cmp(&right).unwrap_or_else(|| {
                left.is_nan().cmp(&right.is_nan())
            })
        }
    }
}

/// Number of pages for `rows` rows; never less than one.
pub fn page_count(rows: usize, page_size: usize) -> usize {
    rows.div_ceil(page_size.max(1)).max(1)
}

/// One rendered grid row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridRow {
    /// Index into the sorted view.
    pub index: usize,
    pub cells: Vec<String>,
    pub selectable: bool,
    pub selected: bool,
}

/// The rows of the current grid page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridPage {
    pub columns: Vec<GridColumn>,
    pub rows: Vec<GridRow>,
    pub page: usize,
    pub page_count: usize,
    pub total_rows: usize,
}

impl GridPage {
    /// Indices of selectable rows on this page, for the header checkbox.
    pub fn selectable_indices(&self) -> Vec<usize> {
        self.rows
            .iter()
            .filter(|row| row.selectable)
            .map(|row| row.index)
            .collect()
    }

    /// True when the page has selectable rows and all of them are selected.
    pub fn all_selected(&self) -> bool {
        let mut selectable = self.rows.iter().filter(|row| row.selectable).peekable();
        selectable.peek().is_some() && selectable.all(|row| row.selected)
    }
}

pub fn grid_page(view: &SortedView, grid: &GridState, selection: &SelectionSet) -> GridPage {
    let columns = grid_columns(view.features());
    let visible = visible_rows(view, grid);
    let page_size = grid.page_size.max(1);
    let page_count = page_count(visible.len(), page_size);
    let page = grid.page.min(page_count - 1);
    let rows = visible
        .iter()
        .skip(page * page_size)
        .take(page_size)
        .map(|index| {
            let record = &view.records()[*index];
            GridRow {
                index: *index,
                cells: columns.iter().map(|column| cell_text(record, column)).collect(),
                selectable: record.id.is_some(),
                selected: record.id.as_ref().is_some_and(|id| selection.contains(id)),
            }
        })
        .collect();
    GridPage {
        columns,
        rows,
        page,
        page_count,
        total_rows: visible.len(),
    }
}

/// Plot coordinates for a dataset; NaN points are skipped.
pub fn plot_points(dataset: &Dataset) -> Vec<[f64; 2]> {
    dataset
        .points
        .iter()
        .enumerate()
        .filter(|(_, value)| !value.is_nan())
        .map(|(index, value)| [index as f64, *value])
        .collect()
}

/// Axis label for x position `x`, if it lands on a label.
pub fn axis_label(labels: &[String], x: f64) -> Option<&str> {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return None;
    }
    labels.get(rounded as usize).map(String::as_str)
}

/// Text lines for the prediction panel.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionSummary {
    pub probability: String,
    pub verdict: &'static str,
    pub is_unicorn: bool,
}

pub fn prediction_summary(prediction: &PredictionResult) -> PredictionSummary {
    PredictionSummary {
        probability: format!(
            "Unicorn probability: {}",
            prediction.predicted_probability
        ),
        verdict: if prediction.is_unicorn {
            "Congratulations! The company is projected to reach unicorn status."
        } else {
            "Unfortunately, the company is not projected to reach unicorn status."
        },
        is_unicorn: prediction.is_unicorn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::egui_app::state::GridSort;
    use crate::records::{FeatureSelector, RecordId, build_series};
    use serde_json::{Value, json};

    fn view(rows: Vec<Value>) -> SortedView {
        SortedView::from_records(
            rows.iter()
                .map(|row| Record::from_json_object(row.as_object().unwrap()))
                .collect(),
        )
    }

    fn sample() -> SortedView {
        view(vec![
            json!({"id": 1, "year": "2021", "company": "Acme", "asset": "1,000"}),
            json!({"id": 2, "year": "2019", "company": "beta", "asset": 50}),
            json!({"id": null, "year": "2020", "company": "Gamma", "asset": "n/a"}),
        ])
    }

    #[test]
    fn columns_lead_with_year_and_company() {
        let columns = grid_columns(sample().features());
        assert_eq!(
            columns,
            vec![
                GridColumn::Year,
                GridColumn::Company,
                GridColumn::Feature("asset".into())
            ]
        );
    }

    #[test]
    fn filter_is_case_insensitive_across_cells() {
        let view = sample();
        let grid = GridState {
            filter: "ACME".into(),
            ..GridState::default()
        };
        assert_eq!(visible_rows(&view, &grid), vec![2]);
        let grid = GridState {
            filter: "1,000".into(),
            ..GridState::default()
        };
        assert_eq!(visible_rows(&view, &grid), vec![2]);
    }

    #[test]
    fn feature_sort_uses_normalized_values_and_leaves_view_alone() {
        let view = sample();
        let before = view.clone();
        let grid = GridState {
            sort: Some(GridSort {
                column: GridColumn::Feature("asset".into()),
                direction: SortDirection::Descending,
            }),
            ..GridState::default()
        };
        // Descending puts the NaN row first, then 1000, then 50.
        assert_eq!(visible_rows(&view, &grid), vec![1, 2, 0]);
        assert_eq!(view, before);
    }

    #[test]
    fn pages_clamp_and_split_rows() {
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);

        let view = sample();
        let grid = GridState {
            page: 9,
            page_size: 2,
            ..GridState::default()
        };
        let page = grid_page(&view, &grid, &SelectionSet::default());
        assert_eq!(page.page, 1);
        assert_eq!(page.page_count, 2);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.total_rows, 3);
    }

    #[test]
    fn rows_without_ids_are_not_selectable() {
        let view = sample();
        let mut selection = SelectionSet::default();
        selection.set(Some(&RecordId::Int(2)), true);
        let page = grid_page(&view, &GridState::default(), &selection);
        let flags: Vec<(bool, bool)> = page
            .rows
            .iter()
            .map(|row| (row.selectable, row.selected))
            .collect();
        assert_eq!(flags, vec![(true, true), (false, false), (true, false)]);
        assert_eq!(page.selectable_indices(), vec![0, 2]);
        assert!(!page.all_selected());
    }

    #[test]
    fn nan_points_are_skipped_when_plotting() {
        let series = build_series(&sample(), sample().features(), &FeatureSelector::All);
        let points = plot_points(&series.datasets[0]);
        assert_eq!(points, vec![[0.0, 50.0], [2.0, 1000.0]]);
        assert_eq!(axis_label(&series.labels, 1.0), Some("2020"));
        assert_eq!(axis_label(&series.labels, 0.5), None);
        assert_eq!(axis_label(&series.labels, 7.0), None);
    }

    #[test]
    fn prediction_summary_reports_verdict() {
        let summary = prediction_summary(&PredictionResult {
            predicted_probability: 0.82,
            is_unicorn: true,
        });
        assert_eq!(summary.probability, "Unicorn probability: 0.82");
        assert!(summary.verdict.starts_with("Congratulations"));
        let summary = prediction_summary(&PredictionResult {
            predicted_probability: 0.1,
            is_unicorn: false,
        });
        assert!(summary.verdict.starts_with("Unfortunately"));
    }
}
