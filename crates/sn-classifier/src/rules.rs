//! Rule-ordered tier assignment. First match wins.

use regex::Regex;
use sn_core::{Element, ElementKind, SectionPath};
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::types::{ClassifierConfig, TierRule};

static RE_SECTION_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\*\([^)]+\)\*?\s*$").unwrap());
static RE_EMPHASIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[*_`]+").unwrap());
static RE_LEAD_MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:(?:[-*+>]|\d{1,9}[.)])\s+)?(?:[*_]+)?").unwrap());

/// Section name without trailing `*(mandatory)*`-style annotations or emphasis, lowercased.
pub fn normalize_section_name(name: &str) -> String {
    let stripped = RE_SECTION_ANNOTATION.replace(name, "");
    RE_EMPHASIS.replace_all(&stripped, "").trim().to_lowercase()
}

/// Lowercase alphanumeric words.
pub fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Word-bounded phrase matcher.
#[derive(Debug, Clone, Default)]
pub struct PhraseMatcher {
    phrases: Vec<Vec<String>>,
}

impl PhraseMatcher {
    pub fn new(phrases: &[String]) -> Self {
        Self {
            phrases: phrases.iter().map(|p| words(p)).filter(|p| !p.is_empty()).collect(),
        }
    }

    /// True if any phrase occurs as a contiguous run of `haystack`.
    pub fn matches(&self, haystack: &[String]) -> bool {
        self.phrases
            .iter()
            .any(|phrase| haystack.windows(phrase.len()).any(|w| w == phrase.as_slice()))
    }
}

/// Section-level facts shared by every element in the section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionFlags {
    pub critical: bool,
    pub optional: bool,
}

/// Compiled form of a [`ClassifierConfig`].
#[derive(Debug, Clone)]
pub struct RuleSet {
    critical_sections: PhraseMatcher,
    optional_sections: PhraseMatcher,
    imperative: PhraseMatcher,
    structural_keys: HashSet<String>,
    example_markers: Vec<String>,
}

impl RuleSet {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            critical_sections: PhraseMatcher::new(&config.critical_section_keywords),
            optional_sections: PhraseMatcher::new(&config.optional_section_keywords),
            imperative: PhraseMatcher::new(&config.imperative_markers),
            structural_keys: config.structural_keys.iter().map(|k| k.to_lowercase()).collect(),
            example_markers: config.example_markers.iter().map(|m| m.to_lowercase()).collect(),
        }
    }

    /// Flags from every segment of `path`, so nested sections inherit their ancestors' names.
    pub fn section_flags(&self, path: &SectionPath) -> SectionFlags {
        let mut flags = SectionFlags::default();
        for segment in path.segments() {
            let name = words(&normalize_section_name(segment));
            flags.critical |= self.critical_sections.matches(&name);
            flags.optional |= self.optional_sections.matches(&name);
        }
        flags
    }

    pub fn evaluate(&self, flags: SectionFlags, element: &Element) -> TierRule {
        if matches!(element.kind(), ElementKind::Requirement | ElementKind::AcceptanceCriterion) {
            return TierRule::CriticalKind;
        }
        if flags.critical {
            return TierRule::CriticalSection;
        }
        if self.is_structural_key(element) {
            return TierRule::StructuralKey;
        }
        if element.kind() == ElementKind::Paragraph && !self.imperative.matches(&words(element.text())) {
            return TierRule::OptionalProse;
        }
        if self.is_example(element.text()) {
            return TierRule::OptionalExample;
        }
        if flags.optional {
            return TierRule::OptionalSection;
        }
        TierRule::Default
    }

    fn is_structural_key(&self, element: &Element) -> bool {
        element
            .key()
            .and_then(|key| words(&key).pop())
            .map(|last| self.structural_keys.contains(&last))
            .unwrap_or(false)
    }

    fn is_example(&self, text: &str) -> bool {
        let body = RE_LEAD_MARKUP.replace(text, "").to_lowercase();
        self.example_markers.iter().any(|m| body.starts_with(m.as_str()))
    }
}
