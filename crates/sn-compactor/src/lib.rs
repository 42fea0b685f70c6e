//! SpecNut compactor: token-reduction pipeline for specification documents.
//!
//! Passes, applied once in this order:
//! 1. Critical: pinned verbatim
//! 2. Important: merge adjacent items, truncate long ones (per level)
//! 3. Optional: dropped
//! 4. Cleanup: empty sections removed bottom-up
//!
//! [`generate_digest`] runs the whole flow from raw text to rendered digest.

pub mod config;
pub mod digest;
pub mod metrics;
pub mod pass1_critical;
pub mod pass2_important;
pub mod pass3_optional;
pub mod pass4_cleanup;
pub mod pipeline;
pub mod policy;

pub use config::DigestConfig;
pub use digest::{generate_digest, Digest, DigestRequest};
pub use metrics::{compute, Metrics, SectionAction, SectionMetrics};
pub use pipeline::{optimize, OptimizationResult, OptimizationStats, OptimizerPipeline};
pub use policy::{ImportantPolicy, OptimizerConfig, OptionalPolicy, RetentionPolicy};
pub use sn_classifier::classify;
pub use sn_parser::{parse, render};
