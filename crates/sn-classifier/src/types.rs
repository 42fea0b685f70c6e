use serde::{Deserialize, Serialize};
use sn_core::Tier;
use std::fmt;

/// Keyword sets driving the tier rules. Matching is case-insensitive and word-bounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Section names whose elements are always critical.
    pub critical_section_keywords: Vec<String>,
    /// Key-value keys needed for machine consumption (matched on the key's last word).
    pub structural_keys: Vec<String>,
    /// Section names whose content is optional.
    pub optional_section_keywords: Vec<String>,
    /// Words that keep a prose paragraph out of the optional tier.
    pub imperative_markers: Vec<String>,
    /// Prefixes marking a standalone example.
    pub example_markers: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        crate::config::default_classifier_config()
    }
}

/// The rule that decided an element's tier, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TierRule {
    CriticalKind,
    CriticalSection,
    StructuralKey,
    OptionalProse,
    OptionalExample,
    OptionalSection,
    Default,
}

impl TierRule {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CriticalKind => "critical-kind",
            Self::CriticalSection => "critical-section",
            Self::StructuralKey => "structural-key",
            Self::OptionalProse => "optional-prose",
            Self::OptionalExample => "optional-example",
            Self::OptionalSection => "optional-section",
            Self::Default => "default",
        }
    }

    pub fn tier(&self) -> Tier {
        match self {
            Self::CriticalKind | Self::CriticalSection | Self::StructuralKey => Tier::Critical,
            Self::OptionalProse | Self::OptionalExample | Self::OptionalSection => Tier::Optional,
            Self::Default => Tier::Important,
        }
    }
}

impl fmt::Display for TierRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Element counts per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub critical: usize,
    pub important: usize,
    pub optional: usize,
    pub unclassified: usize,
}

impl TierCounts {
    pub fn total(&self) -> usize {
        self.critical + self.important + self.optional + self.unclassified
    }
}
