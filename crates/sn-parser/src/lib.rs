//! Format detection, parsing and rendering for SpecNut documents.
//!
//! Every format is a [`FormatCodec`]; the process-wide default registry backs
//! the free [`parse`] and [`render`] functions.

pub mod compact;
pub mod inference;
pub mod json;
pub mod markdown;
pub mod registry;
pub mod structured;
pub mod traits;
pub mod yaml;

use std::sync::LazyLock;

use sn_core::metadata::KEY_FORMAT_VERSION;
use sn_core::{Document, Format, FormatHint, FrontMatter, Result, DIGEST_FORMAT_VERSION};

pub use compact::CompactCodec;
pub use json::JsonCodec;
pub use markdown::MarkdownCodec;
pub use registry::FormatRegistry;
pub use traits::FormatCodec;
pub use yaml::YamlCodec;

static DEFAULT_REGISTRY: LazyLock<FormatRegistry> = LazyLock::new(FormatRegistry::with_defaults);

pub fn default_registry() -> &'static FormatRegistry {
    &DEFAULT_REGISTRY
}

/// Parse `raw_text`, resolving the format from `hint`.
pub fn parse(raw_text: &str, hint: &FormatHint) -> Result<Document> {
    DEFAULT_REGISTRY.parse(raw_text, hint)
}

/// Render `doc` as `format`.
pub fn render(doc: &Document, format: Format) -> Result<String> {
    DEFAULT_REGISTRY.render(doc, format)
}

/// Front matter as written by every renderer; `format_version` is always present.
pub fn render_front_matter(doc: &Document) -> FrontMatter {
    let mut fm = doc.front_matter.clone();
    fm.entry(KEY_FORMAT_VERSION.to_string())
        .or_insert_with(|| DIGEST_FORMAT_VERSION.to_string());
    fm
}
