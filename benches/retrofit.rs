//! Benchmarks for the section retrofit pipeline.
//!
//! Run with: cargo bench

use std::fmt::Write as _;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};

use pleat::dom::{Selector, parse_html, query, serialize};
use pleat::{Config, FoldOptions, fold_html, fold_region};

/// Build a product page with `sections` populated section blocks.
fn synthetic_page(sections: usize) -> String {
    let mut blocks = String::new();
    for i in 0..sections {
        write!(
            blocks,
            concat!(
                r#"<div class="section-group" data-section-id="s{i}">"#,
                r#"<div class="section-separator">"#,
                r#"<span class="section-separator-title">Section {i}</span></div>"#,
                r#"<p>Paragraph one of section {i}.</p>"#,
                r#"<p>Paragraph two with <em>markup</em> and "#,
                r##"<a href="#anchor-{i}">links</a>.</p>"##,
                "</div>",
            ),
            i = i
        )
        .unwrap();
    }
    format!(
        concat!(
            "<html><head><title>Product</title></head><body>",
            r#"<div data-controller="product-view">"#,
            r#"<div id="product-section-view-frame">{}</div>"#,
            "</div></body></html>",
        ),
        blocks
    )
}

// ============================================================================
// Whole pipeline
// ============================================================================

fn bench_fold_html(c: &mut Criterion) {
    let html = synthetic_page(50);

    c.bench_function("fold_html_50_sections", |b| {
        b.iter(|| fold_html(&html, &Config::default()).unwrap());
    });
}

fn bench_fold_html_converted_input(c: &mut Criterion) {
    // Re-running over already-folded markup exercises the skip paths
    let folded = fold_html(&synthetic_page(50), &Config::default()).unwrap();

    c.bench_function("fold_html_already_converted", |b| {
        b.iter(|| fold_html(&folded.html, &Config::default()).unwrap());
    });
}

// ============================================================================
// Pipeline stages
// ============================================================================

fn bench_parse_page(c: &mut Criterion) {
    let html = synthetic_page(50);

    c.bench_function("parse_page", |b| {
        b.iter(|| parse_html(&html));
    });
}

fn bench_region_query(c: &mut Criterion) {
    let html = synthetic_page(50);
    let dom = parse_html(&html);
    let selector = Selector::compile(&Config::default().region_selector).unwrap();

    c.bench_function("region_query", |b| {
        b.iter(|| query(&dom, dom.document(), &selector));
    });
}

fn bench_fold_region_only(c: &mut Criterion) {
    let html = synthetic_page(50);
    let selector = Selector::compile(&Config::default().region_selector).unwrap();

    c.bench_function("fold_region_only", |b| {
        b.iter_batched(
            || {
                let dom = parse_html(&html);
                let region = query(&dom, dom.document(), &selector).unwrap();
                (dom, region)
            },
            |(mut dom, region)| fold_region(&mut dom, region, &FoldOptions::default()).unwrap(),
            BatchSize::SmallInput,
        );
    });
}

fn bench_serialize_folded(c: &mut Criterion) {
    let folded = fold_html(&synthetic_page(50), &Config::default()).unwrap();
    let dom = parse_html(&folded.html);

    c.bench_function("serialize_folded", |b| {
        b.iter(|| serialize(&dom));
    });
}

criterion_group!(
    benches,
    // Whole pipeline
    bench_fold_html,
    bench_fold_html_converted_input,
    // Stages
    bench_parse_page,
    bench_region_query,
    bench_fold_region_only,
    bench_serialize_folded,
);
criterion_main!(benches);
