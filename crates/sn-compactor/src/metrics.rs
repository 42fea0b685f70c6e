//! Token metrics comparing an original document with its reduction.

use serde::{Deserialize, Serialize};
use sn_core::{DigestMetadata, Document, Section, SectionPath, TokenScheme};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// What happened to a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionAction {
    Preserved,
    Reduced,
    Omitted,
}

impl SectionAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Preserved => "preserved",
            Self::Reduced => "reduced",
            Self::Omitted => "omitted",
        }
    }
}

impl fmt::Display for SectionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionMetrics {
    pub path: SectionPath,
    pub original_tokens: usize,
    pub reduced_tokens: usize,
    pub reduction: f64,
    pub action: SectionAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub scheme: TokenScheme,
    pub original_tokens: usize,
    pub reduced_tokens: usize,
    /// `(original - reduced) / original`; 0 when the original is empty.
    pub reduction: f64,
    /// Every section present in either document, original order first.
    pub sections: Vec<SectionMetrics>,
}

impl Metrics {
    pub fn reduction_percent(&self) -> f64 {
        self.reduction * 100.0
    }

    pub fn tokens_saved(&self) -> isize {
        self.original_tokens as isize - self.reduced_tokens as isize
    }

    /// Totals recorded in a digest's metadata. Saved digests carry no
    /// per-section counts, so `sections` is empty.
    pub fn from_metadata(metadata: &DigestMetadata) -> Self {
        Self {
            scheme: metadata.token_scheme,
            original_tokens: metadata.source_token_count,
            reduced_tokens: metadata.digest_token_count,
            reduction: ratio(metadata.source_token_count, metadata.digest_token_count),
            sections: Vec::new(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn ratio(original: usize, reduced: usize) -> f64 {
    if original == 0 {
        0.0
    } else {
        (original as f64 - reduced as f64) / original as f64
    }
}

fn same_content(a: &Section, b: &Section) -> bool {
    a.title == b.title
        && a.elements.len() == b.elements.len()
        && a.elements
            .iter()
            .zip(&b.elements)
            .all(|(x, y)| x.kind() == y.kind() && x.text() == y.text())
}

/// Compare `original` and `reduced` under `scheme`. Never fails.
pub fn compute(original: &Document, reduced: &Document, scheme: TokenScheme) -> Metrics {
    let reduced_sections: HashMap<&SectionPath, &Section> =
        reduced.sections().into_iter().map(|s| (&s.path, s)).collect();

    let mut sections = Vec::new();
    for section in original.sections() {
        let original_tokens = section.own_tokens(scheme);
        let (reduced_tokens, action) = match reduced_sections.get(&section.path) {
            None => (0, SectionAction::Omitted),
            Some(kept) if same_content(section, kept) => (kept.own_tokens(scheme), SectionAction::Preserved),
            Some(kept) => (kept.own_tokens(scheme), SectionAction::Reduced),
        };
        sections.push(SectionMetrics {
            path: section.path.clone(),
            original_tokens,
            reduced_tokens,
            reduction: ratio(original_tokens, reduced_tokens),
            action,
        });
    }

    let known: HashSet<&SectionPath> = original.sections().into_iter().map(|s| &s.path).collect();
    for section in reduced.sections() {
        if !known.contains(&section.path) {
            let reduced_tokens = section.own_tokens(scheme);
            sections.push(SectionMetrics {
                path: section.path.clone(),
                original_tokens: 0,
                reduced_tokens,
                reduction: 0.0,
                action: SectionAction::Reduced,
            });
        }
    }

    let original_tokens = original.total_tokens(scheme);
    let reduced_tokens = reduced.total_tokens(scheme);
    Metrics {
        scheme,
        original_tokens,
        reduced_tokens,
        reduction: ratio(original_tokens, reduced_tokens),
        sections,
    }
}
