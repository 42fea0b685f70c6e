use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use sn_core::{Format, FormatHint};

fn generate_markdown(size_kb: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut md = String::with_capacity(size_kb * 1024);
    let mut section = 0;
    while md.len() < size_kb * 1024 {
        md.push_str(&format!("## Section {}\n\n", section));
        md.push_str("This paragraph explains the context behind the feature in some detail.\n\n");
        for i in 0..rng.gen_range(2..6) {
            md.push_str(&format!("- FR-{:03}: The system MUST handle case {}.\n", section * 10 + i, i));
        }
        md.push_str("\n```rust\nfn main() {\n    println!(\"hello\");\n}\n```\n\n");
        md.push_str("| Col A | Col B |\n|-------|-------|\n| val1  | val2  |\n\n");
        section += 1;
    }
    md
}

fn bench_parse_markdown(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_markdown");
    for size in [4, 64, 256] {
        let text = generate_markdown(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| sn_parser::parse(black_box(text), &FormatHint::Explicit(Format::Markdown)).unwrap())
        });
    }
    group.finish();
}

fn bench_render_formats(c: &mut Criterion) {
    let doc = sn_parser::parse(&generate_markdown(64), &FormatHint::Explicit(Format::Markdown)).unwrap();
    let mut group = c.benchmark_group("render");
    for format in Format::all() {
        group.bench_function(format.name(), |b| {
            b.iter(|| sn_parser::render(black_box(&doc), format).unwrap())
        });
    }
    group.finish();
}

fn bench_detect(c: &mut Criterion) {
    let text = generate_markdown(64);
    c.bench_function("detect_auto", |b| {
        b.iter(|| sn_parser::default_registry().detect(black_box(&text), &FormatHint::Auto).unwrap())
    });
}

criterion_group!(benches, bench_parse_markdown, bench_render_formats, bench_detect);
criterion_main!(benches);
