use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use serde_json::{Map, Value, json};
use unicorn_board::records::{FeatureSelector, Record, SortedView, build_series};

const RECORD_COUNT: usize = 5_000;
const FEATURES: [&str; 8] = [
    "asset", "debt", "capital", "income", "cost", "profit", "net_income", "investment",
];

fn setup_view() -> SortedView {
    let records = (0..RECORD_COUNT)
        .map(|i| {
            let mut row = Map::new();
            row.insert("id".into(), json!(i));
            // Reverse order so sorting does real work.
            row.insert("year".into(), json!(format!("{}", 2100 - (i % 100))));
            row.insert("company".into(), json!(format!("C{i}")));
            for (offset, name) in FEATURES.iter().enumerate() {
                let value = if offset % 2 == 0 {
                    Value::String(format!("{},{:03}", i, offset))
                } else {
                    json!(i * offset)
                };
                row.insert((*name).into(), value);
            }
            Record::from_json_object(&row)
        })
        .collect();
    SortedView::from_records(records)
}

fn bench_build_series(c: &mut Criterion) {
    let view = setup_view();
    for selector in [
        FeatureSelector::All,
        FeatureSelector::Feature("profit".into()),
    ] {
        c.bench_with_input(
            BenchmarkId::new("build_series", selector.label()),
            &selector,
            |b, selector| {
                b.iter(|| build_series(black_box(&view), view.features(), black_box(selector)));
            },
        );
    }
}

fn bench_sort(c: &mut Criterion) {
    let records = setup_view().records().to_vec();
    c.bench_function("sorted_view_from_records", |b| {
        b.iter(|| SortedView::from_records(black_box(records.clone())));
    });
}

criterion_group!(benches, bench_build_series, bench_sort);
criterion_main!(benches);
