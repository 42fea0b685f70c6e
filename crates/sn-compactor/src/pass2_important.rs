//! Pass 2: merge and truncate important elements.

use regex::Regex;
use sn_core::{tokenizer, Document, Element, ElementKind, Section, Tier, TokenScheme};
use sn_parser::inference::{infer_kind, slot_for};
use std::sync::LazyLock;

use crate::policy::{OptimizerConfig, OptionalPolicy, RetentionPolicy};

static RE_ITEM_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*+]|\d{1,9}[.)])(?:[ \t]+|$)").unwrap());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportantStats {
    /// Elements absorbed into a preceding element.
    pub merged: usize,
    pub truncated: usize,
}

pub fn apply(mut doc: Document, policy: &RetentionPolicy, config: &OptimizerConfig) -> (Document, ImportantStats) {
    let mut stats = ImportantStats::default();
    if policy.important.is_verbatim() {
        return (doc, stats);
    }
    for section in &mut doc.sections {
        reduce_section(section, policy, config, &mut stats);
    }
    (doc, stats)
}

fn reduce_section(section: &mut Section, policy: &RetentionPolicy, config: &OptimizerConfig, stats: &mut ImportantStats) {
    if policy.important.merge_adjacent {
        let elements = std::mem::take(&mut section.elements);
        section.elements = merge_adjacent(elements, policy, config, stats);
    }
    if policy.important.truncate {
        for element in &mut section.elements {
            if element.tier == Some(Tier::Important)
                && config.truncatable_kinds.contains(&element.kind())
                && truncate(element, config)
            {
                stats.truncated += 1;
            }
        }
    }
    for child in &mut section.children {
        reduce_section(child, policy, config, stats);
    }
}

/// Merge runs of important elements of one mergeable kind.
///
/// Elements the optional pass will drop do not break a run, so running the
/// optimizer again over its own output finds nothing left to merge. A run
/// also ends where the joined text would parse back as another kind.
pub fn merge_adjacent(
    elements: Vec<Element>,
    policy: &RetentionPolicy,
    config: &OptimizerConfig,
    stats: &mut ImportantStats,
) -> Vec<Element> {
    let mut out: Vec<Element> = Vec::with_capacity(elements.len());
    let mut head: Option<usize> = None;

    for element in elements {
        let dropped_later = element.tier == Some(Tier::Optional) && policy.optional == OptionalPolicy::Drop;
        if dropped_later {
            out.push(element);
            continue;
        }

        let mergeable = element.tier == Some(Tier::Important) && config.mergeable_kinds.contains(&element.kind());
        if !mergeable {
            out.push(element);
            head = None;
            continue;
        }

        let joined = head
            .filter(|&h| out[h].kind() == element.kind())
            .map(|h| (h, join(out[h].text(), element.text(), &config.merge_joiner)))
            .filter(|(_, text)| keeps_kind(text, element.kind()));
        match joined {
            Some((h, text)) => {
                out[h].replace_text(text);
                stats.merged += 1;
            }
            None => {
                head = Some(out.len());
                out.push(element);
            }
        }
    }
    out
}

/// Later items lose leading whitespace and their list marker.
pub fn join(first: &str, next: &str, joiner: &str) -> String {
    let next = next.trim_start();
    let next = RE_ITEM_MARKER.replace(next, "");
    format!("{first}{joiner}{next}")
}

fn keeps_kind(text: &str, kind: ElementKind) -> bool {
    infer_kind(text, slot_for(kind)) == kind
}

/// Cut to the budget, marker included. Returns true if the text changed.
///
/// The cut is skipped unless it lowers the count under every token scheme
/// and leaves the kind unchanged.
pub fn truncate(element: &mut Element, config: &OptimizerConfig) -> bool {
    let budget = config.effective_budget();
    if element.text().chars().count() <= budget {
        return false;
    }
    let keep = budget - config.truncation_marker.chars().count();
    let head: String = element.text().chars().take(keep).collect();
    let cut = format!("{}{}", head.trim_end(), config.truncation_marker);
    let shrinks = TokenScheme::all()
        .into_iter()
        .all(|scheme| tokenizer::count(&cut, scheme) < element.token_count(scheme));
    if !shrinks || !keeps_kind(&cut, element.kind()) {
        return false;
    }
    element.replace_text(cut);
    true
}
