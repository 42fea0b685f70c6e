use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;
use sn_core::tokenizer::{self, TokenScheme};
use sn_core::{Document, Element, ElementKind, Format, Section};

fn random_text(len: usize) -> String {
    let words = ["system", "MUST", "export", "digest", "token", "the", "a", "requirement", "user", "story"];
    let mut rng = rand::thread_rng();
    let mut text = String::with_capacity(len);
    while text.len() < len {
        text.push_str(words[rng.gen_range(0..words.len())]);
        text.push(' ');
    }
    text
}

fn bench_tokenizer(c: &mut Criterion) {
    let text_10k = random_text(10 * 1024);
    for scheme in TokenScheme::all() {
        c.bench_function(&format!("count_{}_10kb", scheme.name()), |b| {
            b.iter(|| black_box(tokenizer::count(black_box(&text_10k), scheme)))
        });
    }
}

fn bench_document(c: &mut Criterion) {
    let mut doc = Document::new(Format::Markdown);
    for i in 0..200 {
        let mut section = Section::titled(format!("Section {}", i % 20), 2);
        for _ in 0..10 {
            section.elements.push(Element::new(ElementKind::Paragraph, random_text(200)));
        }
        doc.sections.push(section);
    }

    c.bench_function("assign_paths_200_sections", |b| {
        b.iter(|| {
            let mut d = doc.clone();
            d.assign_paths();
            black_box(d)
        })
    });
    c.bench_function("total_tokens_2000_elements", |b| {
        b.iter(|| black_box(doc.total_tokens(TokenScheme::Chars4)))
    });
}

criterion_group!(benches, bench_tokenizer, bench_document);
criterion_main!(benches);
