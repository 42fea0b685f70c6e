//! Optimizer pipeline: critical, important, optional, cleanup, applied once.

use serde::Serialize;
use sn_core::{CompressionLevel, Document};
use tracing::debug;

use crate::policy::{OptimizerConfig, OptionalPolicy};
use crate::{pass1_critical, pass2_important, pass3_optional, pass4_cleanup};

/// Optimization result with statistics.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    pub document: Document,
    pub level: CompressionLevel,
    pub stages_applied: Vec<String>,
    pub stats: OptimizationStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OptimizationStats {
    /// Untiered elements kept as critical.
    pub promoted: usize,
    /// Elements absorbed by a merge.
    pub merged: usize,
    pub truncated: usize,
    pub dropped: usize,
    pub sections_dropped: usize,
}

/// The optimizer.
#[derive(Debug, Clone, Default)]
pub struct OptimizerPipeline {
    pub config: OptimizerConfig,
}

impl OptimizerPipeline {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// Reduce `doc` at `level`. Never fails; running it again on its own output changes nothing.
    pub fn optimize(&self, doc: Document, level: CompressionLevel) -> OptimizationResult {
        let policy = self.config.policy(level);
        let mut stages = Vec::new();
        let mut stats = OptimizationStats::default();

        let (doc, promoted) = pass1_critical::apply(doc);
        stats.promoted = promoted;
        stages.push("critical".to_string());

        let (doc, important) = pass2_important::apply(doc, policy, &self.config);
        stats.merged = important.merged;
        stats.truncated = important.truncated;
        if policy.important.merge_adjacent {
            stages.push("important:merge".to_string());
        }
        if policy.important.truncate {
            stages.push("important:truncate".to_string());
        }

        let (doc, dropped) = pass3_optional::apply(doc, policy);
        stats.dropped = dropped;
        if policy.optional == OptionalPolicy::Drop {
            stages.push("optional:drop".to_string());
        }

        let (doc, sections_dropped) = pass4_cleanup::apply(doc);
        stats.sections_dropped = sections_dropped;
        stages.push("cleanup".to_string());

        debug!(
            level = %level,
            merged = stats.merged,
            truncated = stats.truncated,
            dropped = stats.dropped,
            sections_dropped = stats.sections_dropped,
            "optimized document"
        );

        OptimizationResult {
            document: doc,
            level,
            stages_applied: stages,
            stats,
        }
    }
}

/// Optimize with the default retention policies.
pub fn optimize(doc: Document, level: CompressionLevel) -> Document {
    OptimizerPipeline::default().optimize(doc, level).document
}
