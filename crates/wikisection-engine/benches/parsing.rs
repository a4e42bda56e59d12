use criterion::{Criterion, criterion_group, criterion_main};
use wikisection_engine::{Page, parsing::IgnoredRanges};
mod common;

fn bench_parse_and_print(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let nested = common::generate_nested_page(200, 4);
    group.bench_function("parse_nested", |b| {
        b.iter(|| {
            let page = Page::parse("bench", std::hint::black_box(&nested)).unwrap();
            std::hint::black_box(page);
        });
    });

    let entry = common::generate_entry_page(50);
    group.bench_function("parse_entry", |b| {
        b.iter(|| {
            let page = Page::parse_entry("bench", std::hint::black_box(&entry)).unwrap();
            std::hint::black_box(page);
        });
    });

    let page = Page::parse_entry("bench", &entry).unwrap();
    group.bench_function("print_entry", |b| {
        b.iter(|| std::hint::black_box(page.to_string()));
    });

    group.bench_function("scan_ignored_ranges", |b| {
        b.iter(|| std::hint::black_box(IgnoredRanges::for_wikitext(&nested)));
    });

    group.finish();
}

criterion_group!(benches, bench_parse_and_print);
criterion_main!(benches);
