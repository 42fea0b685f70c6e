//! SpecNut classifier: assigns an importance tier to every element.

pub mod config;
pub mod rules;
pub mod types;

pub use config::CLASSIFIER_CONFIG;
pub use rules::{normalize_section_name, RuleSet, SectionFlags};
pub use types::*;

use sn_core::{Document, Element, Section, SectionPath, Tier};
use tracing::{debug, trace};

/// Tier classifier over a compiled rule set.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RuleSet,
}

impl Classifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            rules: RuleSet::new(config),
        }
    }

    /// Tier every element. Existing tiers are overwritten.
    pub fn classify(&self, mut doc: Document) -> Document {
        for section in &mut doc.sections {
            self.classify_section(section);
        }
        let counts = tier_counts(&doc);
        debug!(
            critical = counts.critical,
            important = counts.important,
            optional = counts.optional,
            "classified document"
        );
        doc
    }

    fn classify_section(&self, section: &mut Section) {
        let flags = self.rules.section_flags(&section.path);
        for element in &mut section.elements {
            let rule = self.rules.evaluate(flags, element);
            trace!(path = %section.path, rule = %rule, "tier {}", rule.tier());
            element.tier = Some(rule.tier());
        }
        for child in &mut section.children {
            self.classify_section(child);
        }
    }

    /// Tier and deciding rule for one element, without touching the document.
    pub fn explain(&self, path: &SectionPath, element: &Element) -> (Tier, TierRule) {
        let rule = self.rules.evaluate(self.rules.section_flags(path), element);
        (rule.tier(), rule)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&CLASSIFIER_CONFIG)
    }
}

/// Classify with the default keyword sets.
pub fn classify(doc: Document) -> Document {
    Classifier::default().classify(doc)
}

pub fn tier_counts(doc: &Document) -> TierCounts {
    let mut counts = TierCounts::default();
    for (_, element) in doc.elements() {
        match element.tier {
            Some(Tier::Critical) => counts.critical += 1,
            Some(Tier::Important) => counts.important += 1,
            Some(Tier::Optional) => counts.optional += 1,
            None => counts.unclassified += 1,
        }
    }
    counts
}
