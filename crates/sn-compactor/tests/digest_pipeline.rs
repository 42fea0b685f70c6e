//! End-to-end properties of the digest pipeline across crates.

use chrono::{DateTime, TimeZone, Utc};
use sn_compactor::{classify, compute, generate_digest, optimize, parse, render, DigestConfig, DigestRequest};
use sn_core::{
    tokenizer, CompressionLevel, DigestMetadata, Document, Format, FormatHint, Location, SnError, Tier,
    TokenScheme,
};

const SPEC: &str = "---
title: Export Service
---
# Export Service

**Status**: Draft
**Created**: 2026-01-15

Overview prose that is just background chatter for readers.

## Requirements

- **FR-001**: The system MUST export CSV.
- **FR-002**: The system MUST export JSON.

## User Stories

Users should be able to export their data without contacting support, which is a long sentence that keeps going and going so that the truncation budget of two hundred characters is clearly exceeded by this single paragraph of text.

- export from the dashboard
- export from the API
- schedule recurring exports

1. first step
2. second step

| Field | Type |
|-------|------|
| id    | int  |

### Acceptance Scenarios

1. **Given** a user, **When** they click export, **Then** a file downloads.

## Background

The project started after many requests.

For example, one customer exported by hand.

```sh
curl /export
```
";

fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

fn classified() -> Document {
    classify(parse(SPEC, &FormatHint::Extension("md".into())).unwrap())
}

fn critical_texts(doc: &Document) -> Vec<String> {
    doc.elements()
        .into_iter()
        .filter(|(_, e)| e.tier == Some(Tier::Critical))
        .map(|(_, e)| e.text().to_string())
        .collect()
}

// ========== Testable properties ==========

#[test]
fn test_idempotence_every_level() {
    let doc = classified();
    for level in CompressionLevel::all() {
        let once = optimize(doc.clone(), level);
        assert_eq!(optimize(once.clone(), level), once, "{level}");
    }
}

#[test]
fn test_tier_monotonicity() {
    let doc = classified();
    for scheme in TokenScheme::all() {
        let tokens: Vec<usize> = CompressionLevel::all()
            .into_iter()
            .map(|level| optimize(doc.clone(), level).total_tokens(scheme))
            .collect();
        assert!(tokens[0] >= tokens[1], "{scheme}: {tokens:?}");
        assert!(tokens[1] >= tokens[2], "{scheme}: {tokens:?}");
        assert!(tokens[2] < doc.total_tokens(scheme));
    }
}

#[test]
fn test_tier_monotonicity_long_single_word() {
    let src = format!("# Spec\n\n## Design\n\n- https://example.com/{}\n", "x".repeat(300));
    let doc = classify(parse(&src, &FormatHint::Explicit(Format::Markdown)).unwrap());
    for scheme in TokenScheme::all() {
        let tokens: Vec<usize> = CompressionLevel::all()
            .into_iter()
            .map(|level| optimize(doc.clone(), level).total_tokens(scheme))
            .collect();
        assert!(tokens[0] >= tokens[1], "{scheme}: {tokens:?}");
        assert!(tokens[1] >= tokens[2], "{scheme}: {tokens:?}");
    }
    let high = optimize(doc.clone(), CompressionLevel::High);
    assert_eq!(high.content_signature(), doc.content_signature());
}

#[test]
fn test_critical_preservation() {
    let doc = classified();
    let critical = critical_texts(&doc);
    assert_eq!(critical.len(), 5);

    for level in CompressionLevel::all() {
        let reduced = optimize(doc.clone(), level);
        let markdown = render(&reduced, Format::Markdown).unwrap();
        for text in &critical {
            assert!(markdown.contains(text.as_str()), "{level}: {text}");
        }
        for format in Format::all() {
            let back = parse(&render(&reduced, format).unwrap(), &FormatHint::Explicit(format)).unwrap();
            let texts: Vec<_> = back.elements().iter().map(|(_, e)| e.text().to_string()).collect();
            for text in &critical {
                assert!(texts.contains(text), "{level}/{format}: {text}");
            }
        }
    }
}

#[test]
fn test_structural_round_trip() {
    let doc = classified();
    for level in CompressionLevel::all() {
        let reduced = optimize(doc.clone(), level);
        for format in Format::all() {
            let out = render(&reduced, format).unwrap();
            let back = parse(&out, &FormatHint::Explicit(format)).unwrap();
            assert_eq!(back.content_signature(), reduced.content_signature(), "{level}/{format}");
        }
    }
}

#[test]
fn test_structural_round_trip_structured_sources() {
    let json = r#"{"feature":{"primary user facing goal":"fast exports","owner (team)":"data"},"requirements":["The API MUST paginate."]}"#;
    let yaml = "description: |\n  Export data.\n  - csv files\n  - json files\nrequirements:\n  - The API MUST paginate.\ndesign:\n  - given a cart\n  - when paying\n  - then a receipt\n";
    for (src, source) in [(json, Format::Json), (yaml, Format::Yaml)] {
        let doc = classify(parse(src, &FormatHint::Explicit(source)).unwrap());
        for level in CompressionLevel::all() {
            let reduced = optimize(doc.clone(), level);
            for format in Format::all() {
                let out = render(&reduced, format).unwrap();
                let back = parse(&out, &FormatHint::Explicit(format)).unwrap();
                assert_eq!(
                    back.content_signature(),
                    reduced.content_signature(),
                    "{source} -> {level}/{format}"
                );
            }
        }
    }
}

#[test]
fn test_metrics_match_rendered_markdown() {
    let doc = classified();
    let scheme = TokenScheme::Chars4;
    for level in CompressionLevel::all() {
        let mut reduced = optimize(doc.clone(), level);
        reduced.front_matter.insert("generated_at".into(), "2026-01-15T10:00:00Z".into());
        let metrics = compute(&doc, &reduced, scheme);
        let rendered = tokenizer::count(&render(&reduced, Format::Markdown).unwrap(), scheme);

        let front_matter: usize = sn_parser::render_front_matter(&reduced)
            .iter()
            .map(|(k, v)| tokenizer::count(&format!("{k}: {v}\n"), scheme))
            .sum();
        let slack = front_matter + 2 + 3 * reduced.sections().len() + 2 * reduced.element_count();
        assert!(
            rendered.abs_diff(metrics.reduced_tokens) <= slack,
            "{level}: rendered={rendered} metrics={} slack={slack}",
            metrics.reduced_tokens
        );
    }
}

#[test]
fn test_requirements_kept_background_omitted() {
    let src = "## Requirements\n\n\
- FR-001: The system MUST log in users.\n\
- FR-002: The system MUST log out users.\n\
- FR-003: The system MUST reset passwords.\n\
- FR-004: The system MUST lock accounts.\n\
- FR-005: The system MUST audit access.\n\n\
## Background\n\n\
The team started this work last year.\n\n\
Several customers asked for it.\n\n\
Competitors already ship something similar.\n";
    let request = DigestRequest::new(CompressionLevel::High, at());
    let digest = generate_digest(src, &FormatHint::Explicit(Format::Markdown), &request, &DigestConfig::default()).unwrap();

    assert!(digest.content.contains("## Requirements"));
    for line in src.lines().filter(|l| l.starts_with("- FR-")) {
        assert!(digest.content.contains(line), "{line}");
    }
    assert!(!digest.content.contains("Background"));
    assert!(!digest.content.contains("Competitors"));
    assert!(digest.metrics.reduction > 0.0);
}

#[test]
fn test_empty_input_every_level() {
    for level in CompressionLevel::all() {
        let request = DigestRequest::new(level, at());
        let digest = generate_digest("", &FormatHint::Auto, &request, &DigestConfig::default()).unwrap();
        assert_eq!(digest.metrics.original_tokens, 0);
        assert_eq!(digest.metrics.reduced_tokens, 0);
        assert_eq!(digest.metrics.reduction, 0.0);
        assert!(digest.metrics.sections.is_empty());
        assert!(parse(&digest.content, &FormatHint::Auto).unwrap().is_empty());
    }
}

#[test]
fn test_malformed_json_reports_location() {
    let request = DigestRequest::new(CompressionLevel::Medium, at());
    let err = generate_digest(
        r#"{"a":"#,
        &FormatHint::Extension("json".into()),
        &request,
        &DigestConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SnError::MalformedInput { format: Format::Json, .. }));
    assert!(matches!(err.location(), Some(Location::LineColumn { line: 1, .. })));
}

#[test]
fn test_undetectable_input() {
    let request = DigestRequest::new(CompressionLevel::Medium, at());
    let err = generate_digest("plain words only", &FormatHint::Auto, &request, &DigestConfig::default()).unwrap_err();
    assert!(matches!(err, SnError::UnsupportedFormat { .. }));
}

// ========== Digest orchestration ==========

#[test]
fn test_digest_metadata_embedded() {
    let request = DigestRequest::new(CompressionLevel::Medium, at());
    let digest = generate_digest(SPEC, &FormatHint::Auto, &request, &DigestConfig::default()).unwrap();
    assert_eq!(digest.format, Format::Markdown);

    let parsed = parse(&digest.content, &FormatHint::Auto).unwrap();
    let metadata = DigestMetadata::from_document(&parsed).unwrap();
    assert_eq!(metadata, digest.metadata);
    assert_eq!(metadata.generated_at, at());
    assert_eq!(metadata.source_token_count, digest.metrics.original_tokens);
    assert_eq!(metadata.digest_token_count, digest.metrics.reduced_tokens);
    assert_eq!(parsed.front_matter.get("title").unwrap(), "Export Service");
    assert!(!metadata.is_stale(SPEC));
    assert!(metadata.is_stale(&SPEC.replace("CSV", "TSV")));
}

#[test]
fn test_digest_output_format_override() {
    let request = DigestRequest::new(CompressionLevel::High, at()).with_output_format(Format::Json);
    let digest = generate_digest(SPEC, &FormatHint::Auto, &request, &DigestConfig::default()).unwrap();
    assert_eq!(digest.format, Format::Json);

    let back = parse(&digest.content, &FormatHint::Auto).unwrap();
    let expected = optimize(classified(), CompressionLevel::High);
    assert_eq!(back.content_signature(), expected.content_signature());
    assert_eq!(DigestMetadata::from_document(&back).unwrap(), digest.metadata);
}

#[test]
fn test_digest_is_deterministic() {
    let request = DigestRequest::new(CompressionLevel::High, at()).with_output_format(Format::Compact);
    let a = generate_digest(SPEC, &FormatHint::Auto, &request, &DigestConfig::default()).unwrap();
    let b = generate_digest(SPEC, &FormatHint::Auto, &request, &DigestConfig::default()).unwrap();
    assert_eq!(a.content, b.content);
}

#[test]
fn test_digest_scheme_override() {
    let request = DigestRequest::new(CompressionLevel::Low, at()).with_scheme(TokenScheme::Words);
    let digest = generate_digest(SPEC, &FormatHint::Auto, &request, &DigestConfig::default()).unwrap();
    assert_eq!(digest.metrics.scheme, TokenScheme::Words);
    assert_eq!(digest.metadata.token_scheme, TokenScheme::Words);
}

#[test]
fn test_yaml_source_digest() {
    let src = "---\nid: SPEC-9\nrequirements:\n  - The API MUST paginate.\nbackground:\n  - It was slow.\ndesign:\n  - cache pages\n  - warm caches nightly\n";
    let request = DigestRequest::new(CompressionLevel::Medium, at());
    let digest = generate_digest(src, &FormatHint::Auto, &request, &DigestConfig::default()).unwrap();
    assert_eq!(digest.format, Format::Yaml);

    let back = parse(&digest.content, &FormatHint::Auto).unwrap();
    let texts: Vec<_> = back.elements().iter().map(|(_, e)| e.text().to_string()).collect();
    assert_eq!(texts, vec!["id: SPEC-9", "- The API MUST paginate.", "- cache pages; warm caches nightly"]);
}

// ========== Concurrency ==========

#[tokio::test]
async fn test_parallel_levels_share_parsed_document() {
    let doc = std::sync::Arc::new(classified());
    let handles: Vec<_> = CompressionLevel::all()
        .into_iter()
        .map(|level| {
            let doc = doc.clone();
            tokio::task::spawn_blocking(move || (level, optimize((*doc).clone(), level)))
        })
        .collect();

    for handle in handles {
        let (level, reduced) = handle.await.unwrap();
        assert_eq!(reduced, optimize(classified(), level));
    }
}
