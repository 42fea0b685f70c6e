//! Per-level retention policies.

use serde::{Deserialize, Serialize};
use sn_core::{CompressionLevel, ElementKind, Result, SnError};

/// Treatment of important elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportantPolicy {
    /// Concatenate contiguous same-kind important elements.
    pub merge_adjacent: bool,
    /// Cut elements longer than the truncation budget.
    pub truncate: bool,
}

impl ImportantPolicy {
    pub fn keep_verbatim() -> Self {
        Self::default()
    }

    pub fn is_verbatim(&self) -> bool {
        !self.merge_adjacent && !self.truncate
    }
}

/// Treatment of optional elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionalPolicy {
    Keep,
    #[default]
    Drop,
}

/// What each tier is allowed to lose. Critical content is never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionPolicy {
    pub important: ImportantPolicy,
    pub optional: OptionalPolicy,
}

/// Optimizer parameters for all levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub low: RetentionPolicy,
    pub medium: RetentionPolicy,
    pub high: RetentionPolicy,
    /// Kinds eligible for merge-adjacent.
    pub mergeable_kinds: Vec<ElementKind>,
    /// Kinds eligible for truncation.
    pub truncatable_kinds: Vec<ElementKind>,
    /// Maximum characters of a truncated element, marker included.
    pub truncate_budget_chars: usize,
    pub truncation_marker: String,
    pub merge_joiner: String,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            low: RetentionPolicy {
                important: ImportantPolicy::keep_verbatim(),
                optional: OptionalPolicy::Drop,
            },
            medium: RetentionPolicy {
                important: ImportantPolicy {
                    merge_adjacent: true,
                    truncate: false,
                },
                optional: OptionalPolicy::Drop,
            },
            high: RetentionPolicy {
                important: ImportantPolicy {
                    merge_adjacent: true,
                    truncate: true,
                },
                optional: OptionalPolicy::Drop,
            },
            mergeable_kinds: vec![ElementKind::ListItem],
            truncatable_kinds: vec![
                ElementKind::Paragraph,
                ElementKind::ListItem,
                ElementKind::TableRow,
                ElementKind::KeyValue,
            ],
            truncate_budget_chars: 200,
            truncation_marker: " [truncated]".into(),
            merge_joiner: "; ".into(),
        }
    }
}

impl OptimizerConfig {
    pub fn policy(&self, level: CompressionLevel) -> &RetentionPolicy {
        match level {
            CompressionLevel::Low => &self.low,
            CompressionLevel::Medium => &self.medium,
            CompressionLevel::High => &self.high,
        }
    }

    /// Budget actually applied: always leaves room for one character besides the marker.
    pub fn effective_budget(&self) -> usize {
        self.truncate_budget_chars
            .max(self.truncation_marker.chars().count() + 1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.truncation_marker.trim().is_empty() {
            return Err(SnError::InvalidConfig("truncation_marker must not be blank".into()));
        }
        if self.truncate_budget_chars <= self.truncation_marker.chars().count() {
            return Err(SnError::InvalidConfig(format!(
                "truncate_budget_chars ({}) must exceed the truncation marker length ({})",
                self.truncate_budget_chars,
                self.truncation_marker.chars().count()
            )));
        }
        if self.merge_joiner.is_empty() {
            return Err(SnError::InvalidConfig("merge_joiner must not be empty".into()));
        }
        Ok(())
    }
}
