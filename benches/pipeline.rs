//! Benchmarks for the document pipeline.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use paperset::document::Pipeline;
use paperset::highlight::PlainHighlighter;
use paperset::layout::{RenderOptions, paginate, render_document};

fn bench_run_simple(c: &mut Criterion) {
    let pipeline = Pipeline::new(Box::new(PlainHighlighter));
    let md = "# Hello\n\nWorld<mdCitation>Ref</mdCitation>";
    c.bench_function("run_simple", |b| {
        b.iter(|| pipeline.run(black_box(md)).unwrap())
    });
}

fn bench_run_paper(c: &mut Criterion) {
    let pipeline = Pipeline::default();
    let md = include_str!("../tests/fixtures/paper.md");
    c.bench_function("run_paper", |b| {
        b.iter(|| pipeline.run(black_box(md)).unwrap())
    });
}

fn bench_render_document(c: &mut Criterion) {
    let paper = Pipeline::default()
        .run(include_str!("../tests/fixtures/paper.md"))
        .unwrap();
    let pages = paginate(&paper);
    let options = RenderOptions::default();
    c.bench_function("render_document", |b| {
        b.iter(|| render_document(black_box(&paper), &pages, &options))
    });
}

criterion_group!(benches, bench_run_simple, bench_run_paper, bench_render_document);
criterion_main!(benches);
