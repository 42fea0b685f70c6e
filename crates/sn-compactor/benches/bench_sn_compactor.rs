use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::seq::SliceRandom;
use sn_compactor::{classify, generate_digest, parse, DigestConfig, DigestRequest, OptimizerPipeline};
use sn_core::{CompressionLevel, Format, FormatHint};

fn generate_spec(sections: usize) -> String {
    let mut rng = rand::thread_rng();
    let titles = ["Requirements", "Background", "Design", "Examples", "Success Criteria", "User Stories"];
    let lines = [
        "- **FR-001**: The system MUST persist drafts.",
        "- cache rendered pages",
        "- retry failed uploads",
        "Historical context about the project and its first users, told at some length for flavour.",
        "Exports should complete within two seconds even when the account holds many thousands of records, because users wait on the page while the file is produced and anything slower feels broken.",
        "**Status**: Draft",
        "| id | int |",
    ];
    let mut md = String::from("# Spec\n\n");
    for i in 0..sections {
        md.push_str(&format!("## {} {}\n\n", titles.choose(&mut rng).unwrap(), i));
        for _ in 0..10 {
            md.push_str(lines.choose(&mut rng).unwrap());
            md.push_str("\n\n");
        }
    }
    md
}

fn bench_optimize_levels(c: &mut Criterion) {
    let doc = classify(parse(&generate_spec(300), &FormatHint::Explicit(Format::Markdown)).unwrap());
    let pipeline = OptimizerPipeline::default();
    let mut group = c.benchmark_group("optimize");
    for level in CompressionLevel::all() {
        group.bench_with_input(BenchmarkId::from_parameter(level), &level, |b, &level| {
            b.iter(|| pipeline.optimize(black_box(doc.clone()), level))
        });
    }
    group.finish();
}

fn bench_generate_digest(c: &mut Criterion) {
    let spec = generate_spec(300);
    let config = DigestConfig::default();
    let request = DigestRequest::new(CompressionLevel::High, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    c.bench_function("generate_digest_3000_elements", |b| {
        b.iter(|| generate_digest(black_box(&spec), &FormatHint::Auto, &request, &config).unwrap())
    });
}

criterion_group!(benches, bench_optimize_levels, bench_generate_digest);
criterion_main!(benches);
