//! SpecNut core: document model, token accounting, errors and digest metadata.

pub mod document;
pub mod error;
pub mod metadata;
pub mod tokenizer;
pub mod types;

pub use document::{Document, Element, FrontMatter, Section, SectionPath};
pub use error::{Location, Result, SnError};
pub use metadata::{DigestMetadata, DIGEST_FORMAT_VERSION};
pub use tokenizer::TokenScheme;
pub use types::{CompressionLevel, ElementKind, Format, FormatHint, Tier};

#[cfg(test)]
mod tests;
