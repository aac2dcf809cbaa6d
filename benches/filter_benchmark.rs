//! Filter/sort engine benchmarks.
//!
//! The engine recomputes the whole view on every criteria change; these
//! benchmarks show how that scales with listing size.
//!
//! Run with: cargo bench

#![allow(missing_docs)] // criterion macros generate undocumented items

use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pdfws::filter;
use pdfws::model::{DateClass, Document, FilterCriteria, ModTime, SizeClass, SortDir, SortKey};
use pdfws::state::{Clock, Command, Workspace};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0)
        .single()
        .expect("valid date")
}

/// Deterministic synthetic listing with spread-out sizes, ages and names.
fn generate_listing(count: usize) -> Vec<Document> {
    (0..count)
        .map(|i| {
            let name = format!("{}-report-{:06}.pdf", ["Annual", "q", "Scan", "memo"][i % 4], i);
            let size = (i as u64 * 7_919) % 40_000_000;
            let mod_time = if i % 97 == 0 {
                ModTime::Invalid
            } else {
                ModTime::At(now() - Duration::minutes((i as i64 * 131) % 200_000))
            };
            Document::new(name.clone(), name, size, mod_time)
        })
        .collect()
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_apply");
    let criteria = FilterCriteria {
        search_term: "report".to_string(),
        size_class: SizeClass::Medium,
        date_class: DateClass::Last30,
        sort_key: SortKey::Name,
        sort_dir: SortDir::Asc,
    };

    for count in [100usize, 1_000, 10_000] {
        let docs = generate_listing(count);
        group.bench_with_input(BenchmarkId::new("filtered_by_name", count), &docs, |b, docs| {
            b.iter(|| filter::visible_indices(black_box(docs), black_box(&criteria), now()))
        });
        group.bench_with_input(BenchmarkId::new("all_by_mod_time", count), &docs, |b, docs| {
            b.iter(|| filter::visible_indices(black_box(docs), &FilterCriteria::default(), now()))
        });
    }
    group.finish();
}

fn bench_criteria_change(c: &mut Criterion) {
    let raws: Vec<_> = generate_listing(10_000)
        .iter()
        .map(pdfws::model::RawDocument::from)
        .collect();
    let mut ws = Workspace::new(Clock::Fixed(now()));
    ws.dispatch(Command::FetchCompleted(raws));

    c.bench_function("workspace_toggle_sort_10k", |b| {
        b.iter(|| ws.toggle_sort(black_box(SortKey::Size)))
    });
}

criterion_group!(benches, bench_engine, bench_criteria_change);
criterion_main!(benches);
