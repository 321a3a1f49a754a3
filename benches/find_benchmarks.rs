//! Find Benchmarks
//!
//! Normalization and per-page matching throughput.
//!
//! Run with: `cargo bench --bench find_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

use pdf_find::search::page_matches::PageText;
use pdf_find::search::query::{compile, MatchOptions};
use pdf_find::search::Query;
use pdf_find::text::normalize;

/// Build page text with line breaks, hyphenation and accented words mixed in.
fn create_page_text(lines: usize, accented: bool) -> String {
    let mut text = String::new();
    for i in 0..lines {
        if accented {
            text.push_str("Le café du coin sert un thé très apprécié, ");
        } else {
            text.push_str("The quick brown fox jumps over the lazy dog, ");
        }
        text.push_str(&format!("line {} with a hyphen-\nated word and a benchmark keyword\n", i));
    }
    text
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    group.measurement_time(Duration::from_secs(5));

    for &accented in &[false, true] {
        let text = create_page_text(200, accented);
        let label = if accented { "accented" } else { "ascii" };
        group.bench_with_input(BenchmarkId::new("page_200_lines", label), &text, |b, text| {
            b.iter(|| black_box(normalize(black_box(text))))
        });
    }

    group.finish();
}

fn bench_compute_matches(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_matches");
    group.measurement_time(Duration::from_secs(5));

    let page = PageText::from_raw(&create_page_text(200, true));
    let cases = [
        ("literal", Query::from("benchmark"), MatchOptions::default(), false),
        ("diacritics_ignored", Query::from("cafe"), MatchOptions::default(), false),
        (
            "diacritics_matched",
            Query::from("café"),
            MatchOptions {
                match_diacritics: true,
                ..Default::default()
            },
            false,
        ),
        ("entire_word", Query::from("word"), MatchOptions::default(), true),
        (
            "phrases",
            Query::Phrases(vec!["hyphenated".to_string(), "coin".to_string(), "thé".to_string()]),
            MatchOptions::default(),
            false,
        ),
    ];

    for (name, query, options, entire_word) in cases {
        let pattern = compile(&query, options, page.has_diacritics()).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| black_box(page.compute_matches(black_box(&pattern), entire_word)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_compute_matches);
criterion_main!(benches);
