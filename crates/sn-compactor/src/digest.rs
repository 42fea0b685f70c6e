//! End-to-end digest generation: parse, classify, optimize, measure, render.

use chrono::{DateTime, Utc};
use sn_classifier::Classifier;
use sn_core::metadata::source_hash;
use sn_core::{
    CompressionLevel, DigestMetadata, Format, FormatHint, Result, TokenScheme, DIGEST_FORMAT_VERSION,
};
use tracing::info;

use crate::config::DigestConfig;
use crate::metrics::{compute, Metrics};
use crate::pipeline::{OptimizationStats, OptimizerPipeline};

/// Per-call parameters. The timestamp is supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct DigestRequest {
    pub level: CompressionLevel,
    /// `None` renders in the input's format.
    pub output_format: Option<Format>,
    pub generated_at: DateTime<Utc>,
    /// `None` uses the configured scheme.
    pub scheme: Option<TokenScheme>,
}

impl DigestRequest {
    pub fn new(level: CompressionLevel, generated_at: DateTime<Utc>) -> Self {
        Self {
            level,
            output_format: None,
            generated_at,
            scheme: None,
        }
    }

    pub fn with_output_format(mut self, format: Format) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn with_scheme(mut self, scheme: TokenScheme) -> Self {
        self.scheme = Some(scheme);
        self
    }
}

/// A rendered digest and what it took to produce it.
#[derive(Debug, Clone)]
pub struct Digest {
    pub content: String,
    pub format: Format,
    pub metrics: Metrics,
    pub metadata: DigestMetadata,
    pub stages_applied: Vec<String>,
    pub stats: OptimizationStats,
}

pub fn generate_digest(
    raw_text: &str,
    hint: &FormatHint,
    request: &DigestRequest,
    config: &DigestConfig,
) -> Result<Digest> {
    let scheme = request.scheme.unwrap_or(config.scheme);

    let parsed = sn_parser::parse(raw_text, hint)?;
    let input_format = parsed.format;
    let classified = Classifier::new(&config.classifier).classify(parsed);
    let optimized = OptimizerPipeline::new(config.optimizer.clone()).optimize(classified.clone(), request.level);
    let metrics = compute(&classified, &optimized.document, scheme);

    let metadata = DigestMetadata {
        format_version: DIGEST_FORMAT_VERSION.to_string(),
        source_hash: source_hash(raw_text),
        generated_at: request.generated_at,
        source_token_count: metrics.original_tokens,
        digest_token_count: metrics.reduced_tokens,
        token_scheme: scheme,
        compression_level: request.level,
    };

    let mut reduced = optimized.document;
    reduced.front_matter.extend(metadata.to_front_matter());

    let format = request.output_format.unwrap_or(input_format);
    let content = sn_parser::render(&reduced, format)?;

    info!(
        input = %input_format,
        output = %format,
        level = %request.level,
        original_tokens = metrics.original_tokens,
        reduced_tokens = metrics.reduced_tokens,
        reduction_pct = metrics.reduction_percent(),
        "digest generated"
    );

    Ok(Digest {
        content,
        format,
        metrics,
        metadata,
        stages_applied: optimized.stages_applied,
        stats: optimized.stats,
    })
}
