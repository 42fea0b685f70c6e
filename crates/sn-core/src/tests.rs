use crate::*;
use crate::metadata::source_hash;
use crate::tokenizer::count;
use chrono::{TimeZone, Utc};

// ========== Tokenizer ==========

#[test]
fn test_count_empty_is_zero() {
    for scheme in TokenScheme::all() {
        assert_eq!(count("", scheme), 0);
    }
}

#[test]
fn test_count_chars4_rounds_up() {
    assert_eq!(count("a", TokenScheme::Chars4), 1);
    assert_eq!(count("abcd", TokenScheme::Chars4), 1);
    assert_eq!(count("abcde", TokenScheme::Chars4), 2);
}

#[test]
fn test_count_chars4_counts_chars_not_bytes() {
    assert_eq!(count("你好世界", TokenScheme::Chars4), 1);
    assert_eq!(count("你好世界", TokenScheme::Bytes3), 4);
}

#[test]
fn test_count_words() {
    assert_eq!(count("The system MUST  export\nJSON", TokenScheme::Words), 5);
}

#[test]
fn test_count_deterministic() {
    let text = "- FR-001: The system MUST parse Markdown input.";
    for scheme in TokenScheme::all() {
        assert_eq!(count(text, scheme), count(text, scheme));
    }
}

#[test]
fn test_count_subadditive() {
    let a = "- first item with words";
    let b = "second item";
    let joined = format!("{a}; {b}");
    for scheme in [TokenScheme::Chars4, TokenScheme::Bytes3, TokenScheme::Words] {
        assert!(count(&joined, scheme) <= count(a, scheme) + count(&format!("- {b}"), scheme));
    }
}

#[test]
fn test_scheme_parse() {
    assert_eq!("chars4".parse::<TokenScheme>().unwrap(), TokenScheme::Chars4);
    assert_eq!(" WORDS ".parse::<TokenScheme>().unwrap(), TokenScheme::Words);
    assert!("gpt2".parse::<TokenScheme>().is_err());
}

#[test]
fn test_scheme_serde_name() {
    let json = serde_json::to_string(&TokenScheme::Bytes3).unwrap();
    assert_eq!(json, "\"bytes3\"");
}

// ========== Types ==========

#[test]
fn test_format_from_extension() {
    assert_eq!(Format::from_extension("md"), Some(Format::Markdown));
    assert_eq!(Format::from_extension(".YML"), Some(Format::Yaml));
    assert_eq!(Format::from_extension("json"), Some(Format::Json));
    assert_eq!(Format::from_extension("txt"), None);
}

#[test]
fn test_format_hint_from_path() {
    let hint = FormatHint::from_path(std::path::Path::new("spec.yaml"));
    assert_eq!(hint, FormatHint::Extension("yaml".into()));
    assert_eq!(FormatHint::from_path(std::path::Path::new("README")), FormatHint::Auto);
}

#[test]
fn test_format_parse_unknown() {
    let err = "toml".parse::<Format>().unwrap_err();
    assert!(matches!(err, SnError::UnsupportedFormat { .. }));
}

#[test]
fn test_kind_tags_unique() {
    for kind in ElementKind::all() {
        assert_eq!(ElementKind::from_tag(kind.tag()), Some(kind));
    }
}

#[test]
fn test_tier_ordering() {
    assert!(Tier::Critical < Tier::Important);
    assert!(Tier::Important < Tier::Optional);
}

#[test]
fn test_level_parse() {
    assert_eq!("HIGH".parse::<CompressionLevel>().unwrap(), CompressionLevel::High);
    assert!("extreme".parse::<CompressionLevel>().is_err());
    assert_eq!(CompressionLevel::default(), CompressionLevel::Medium);
}

// ========== Element ==========

#[test]
fn test_element_token_memo_invalidated_on_replace() {
    let mut e = Element::new(ElementKind::Paragraph, "abcdefgh");
    assert_eq!(e.token_count(TokenScheme::Chars4), 2);
    e.replace_text("abcdefghijkl");
    assert_eq!(e.token_count(TokenScheme::Chars4), 3);
}

#[test]
fn test_element_token_count_other_scheme() {
    let e = Element::new(ElementKind::Paragraph, "one two three four five");
    assert_eq!(e.token_count(TokenScheme::Words), 5);
    assert_eq!(e.token_count(TokenScheme::Chars4), 6);
    assert_eq!(e.token_count(TokenScheme::Words), 5);
}

#[test]
fn test_element_key() {
    let kv = Element::new(ElementKind::KeyValue, "**Status**: Draft");
    assert_eq!(kv.key().as_deref(), Some("Status"));
    let bold = Element::new(ElementKind::KeyValue, "**owner (team): lead**: data");
    assert_eq!(bold.key().as_deref(), Some("owner (team): lead"));
    let p =Element::new(ElementKind::Paragraph, "Status: Draft");
    assert_eq!(p.key(), None);
}

#[test]
fn test_element_eq_ignores_memo() {
    let a = Element::new(ElementKind::ListItem, "- x");
    let b = Element::new(ElementKind::ListItem, "- x");
    a.token_count(TokenScheme::Chars4);
    assert_eq!(a, b);
    assert_ne!(a, b.clone().with_tier(Tier::Optional));
}

// ========== Document ==========

fn sample_doc() -> Document {
    let mut doc = Document::new(Format::Markdown);
    doc.sections.push(
        Section::anonymous(0).with_element(Element::new(ElementKind::Paragraph, "Intro")),
    );
    doc.sections.push(
        Section::titled("Spec", 1)
            .with_child(Section::titled("Example", 2).with_element(Element::new(ElementKind::Paragraph, "one")))
            .with_child(Section::titled("Example", 2).with_element(Element::new(ElementKind::Paragraph, "two")))
            .with_child(Section::titled("Example~2", 2)),
    );
    doc.assign_paths();
    doc
}

#[test]
fn test_assign_paths_unique() {
    let doc = sample_doc();
    let paths: Vec<String> = doc.sections().iter().map(|s| s.path.to_string()).collect();
    assert_eq!(
        paths,
        vec!["#1", "Spec", "Spec / Example", "Spec / Example~2", "Spec / Example~2~2"]
    );
}

#[test]
fn test_document_traversal_order() {
    let doc = sample_doc();
    let texts: Vec<&str> = doc.elements().iter().map(|(_, e)| e.text()).collect();
    assert_eq!(texts, vec!["Intro", "one", "two"]);
    assert_eq!(doc.element_count(), 3);
}

#[test]
fn test_document_total_tokens_includes_titles() {
    let doc = sample_doc();
    // "Intro"(2) + "Spec"(1) + "Example"(2)+"one"(1) + "Example"(2)+"two"(1) + "Example~2"(3)
    assert_eq!(doc.total_tokens(TokenScheme::Chars4), 12);
}

#[test]
fn test_find_section() {
    let doc = sample_doc();
    let path = SectionPath::new(["Spec", "Example~2"]);
    let s = doc.find_section(&path).unwrap();
    assert_eq!(s.elements[0].text(), "two");
}

#[test]
fn test_is_classified() {
    let mut doc = sample_doc();
    assert!(!doc.is_classified());
    for s in doc.sections.iter_mut() {
        for e in s.elements.iter_mut() {
            e.tier = Some(Tier::Important);
        }
        for c in s.children.iter_mut() {
            for e in c.elements.iter_mut() {
                e.tier = Some(Tier::Important);
            }
        }
    }
    assert!(doc.is_classified());
}

#[test]
fn test_empty_document() {
    let doc = Document::new(Format::Json);
    assert!(doc.is_empty());
    assert_eq!(doc.total_tokens(TokenScheme::Chars4), 0);
    assert!(doc.is_classified());
}

// ========== Metadata ==========

fn sample_meta() -> DigestMetadata {
    DigestMetadata {
        format_version: DIGEST_FORMAT_VERSION.into(),
        source_hash: source_hash("# Spec"),
        generated_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        source_token_count: 120,
        digest_token_count: 80,
        token_scheme: TokenScheme::Chars4,
        compression_level: CompressionLevel::High,
    }
}

#[test]
fn test_source_hash_is_sha256_hex() {
    let h = source_hash("abc");
    assert_eq!(h, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
}

#[test]
fn test_metadata_front_matter_roundtrip() {
    let meta = sample_meta();
    let fm = meta.to_front_matter();
    assert_eq!(fm.get("generated_at").unwrap(), "2026-01-15T10:00:00Z");
    assert_eq!(DigestMetadata::from_front_matter(&fm), Some(meta));
}

#[test]
fn test_metadata_missing_field() {
    let mut fm = sample_meta().to_front_matter();
    fm.remove("source_hash");
    assert_eq!(DigestMetadata::from_front_matter(&fm), None);
}

#[test]
fn test_metadata_staleness() {
    let meta = sample_meta();
    assert!(!meta.is_stale("# Spec"));
    assert!(meta.is_stale("# Spec v2"));
}

// ========== Errors ==========

#[test]
fn test_malformed_error_display() {
    let err = SnError::malformed(
        Format::Json,
        Location::LineColumn { line: 1, column: 5 },
        "EOF while parsing an object",
    );
    assert_eq!(
        err.to_string(),
        "Malformed json input at line 1, column 5: EOF while parsing an object"
    );
    assert_eq!(err.location(), Some(&Location::LineColumn { line: 1, column: 5 }));
}
