//! Benchmarks for the topic clustering pipeline
//!
//! Synthetic topic documents stand in for a large starred-repos file.
//! Run with: `cargo bench --bench clustering`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stargazer::analysis::vectorizer::tokenize;
use stargazer::analysis::{KMeans, TfidfVectorizer};

// =============================================================================
// Benchmark Data
// =============================================================================

const TOPICS: &[&str] = &[
    "rust", "cli", "terminal", "python", "machine-learning", "deep-learning", "javascript",
    "react", "frontend", "golang", "kubernetes", "docker", "database", "sql", "compiler",
    "wasm", "game-engine", "graphics", "security", "networking",
];

/// Deterministic documents of 2-5 topics drawn from a few overlapping groups
fn documents(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            let group = (i % 5) * 4;
            let width = 2 + i % 4;
            (0..width)
                .map(|j| TOPICS[(group + j + i / 7) % TOPICS.len()])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

// =============================================================================
// Vectorizer Benchmarks
// =============================================================================

fn bench_tokenize(c: &mut Criterion) {
    let doc = "rust cli terminal machine-learning deep-learning game-engine";
    c.bench_function("tokenize", |b| b.iter(|| tokenize(black_box(doc))));
}

fn bench_tfidf(c: &mut Criterion) {
    let mut group = c.benchmark_group("tfidf_fit_transform");
    for size in [100, 1_000, 5_000] {
        let docs = documents(size);
        let vectorizer = TfidfVectorizer::default();
        group.bench_with_input(BenchmarkId::from_parameter(size), &docs, |b, docs| {
            b.iter(|| vectorizer.fit_transform(black_box(docs.as_slice())).unwrap())
        });
    }
    group.finish();
}

// =============================================================================
// K-Means Benchmarks
// =============================================================================

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans_fit");
    group.sample_size(10);
    for size in [100, 1_000, 5_000] {
        let tfidf = TfidfVectorizer::default()
            .fit_transform(documents(size).as_slice())
            .unwrap();
        let kmeans = KMeans::new(8).with_seed(42);
        group.bench_with_input(BenchmarkId::from_parameter(size), &tfidf.matrix, |b, m| {
            b.iter(|| kmeans.fit(black_box(m)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(vectorizer_benchmarks, bench_tokenize, bench_tfidf);
criterion_group!(kmeans_benchmarks, bench_kmeans);

criterion_main!(vectorizer_benchmarks, kmeans_benchmarks);
