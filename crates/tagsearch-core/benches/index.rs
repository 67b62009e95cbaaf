//! Benchmarks for tag index construction and lookup.
//!
//! Run with: cargo bench -p tagsearch-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use tagsearch_core::{Concept, PerImageLabels, QueryService, TagIndex, TagIndexBuilder};

const LABELS: usize = 200;
const IMAGES: usize = 5_000;
const LABELS_PER_IMAGE: usize = 20;

fn synthetic_results() -> Vec<PerImageLabels> {
    (0..IMAGES)
        .map(|i| PerImageLabels {
            image: format!("https://images.example.com/{i}.jpg"),
            labels: (0..LABELS_PER_IMAGE)
                .map(|j| {
                    let label = (i * 31 + j * 17) % LABELS;
                    let confidence = ((i * 7919 + j * 104_729) % 1000) as f64 / 1000.0;
                    Concept::new(format!("label-{label}"), confidence)
                })
                .collect(),
        })
        .collect()
}

fn build(results: &[PerImageLabels]) -> TagIndex {
    let mut builder = TagIndexBuilder::new();
    for chunk in results.chunks(128) {
        builder.merge(chunk);
    }
    builder.finish(None)
}

fn benchmark_build(c: &mut Criterion) {
    let results = synthetic_results();
    c.bench_function("index_build_100k_hits", |b| {
        b.iter(|| build(black_box(&results)))
    });
}

fn benchmark_search(c: &mut Criterion) {
    let service = QueryService::new(Arc::new(build(&synthetic_results())), 10);

    c.bench_function("search_top10", |b| {
        b.iter(|| service.search(black_box("label-42")))
    });

    c.bench_function("fetch_tags", |b| b.iter(|| service.fetch_tags()));
}

criterion_group!(benches, benchmark_build, benchmark_search);
criterion_main!(benches);
