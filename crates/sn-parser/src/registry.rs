//! Codec lookup keyed on format tag.

use sn_core::{Document, Format, FormatHint, Result, SnError};
use tracing::debug;

use crate::compact::CompactCodec;
use crate::json::JsonCodec;
use crate::markdown::MarkdownCodec;
use crate::traits::FormatCodec;
use crate::yaml::YamlCodec;

/// Ordered set of codecs. Registration order is sniffing priority.
pub struct FormatRegistry {
    codecs: Vec<Box<dyn FormatCodec>>,
}

impl FormatRegistry {
    /// Registry without codecs.
    pub fn empty() -> Self {
        Self { codecs: Vec::new() }
    }

    /// YAML, JSON, Markdown, compact, in that sniffing order.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(YamlCodec::new()));
        registry.register(Box::new(JsonCodec::new()));
        registry.register(Box::new(MarkdownCodec::new()));
        registry.register(Box::new(CompactCodec::new()));
        registry
    }

    /// Add a codec; a later codec for the same format replaces the earlier one in place.
    pub fn register(&mut self, codec: Box<dyn FormatCodec>) {
        match self.codecs.iter().position(|c| c.format() == codec.format()) {
            Some(i) => self.codecs[i] = codec,
            None => self.codecs.push(codec),
        }
    }

    pub fn get(&self, format: Format) -> Option<&dyn FormatCodec> {
        self.codecs
            .iter()
            .find(|c| c.format() == format)
            .map(|c| c.as_ref())
    }

    pub fn formats(&self) -> Vec<Format> {
        self.codecs.iter().map(|c| c.format()).collect()
    }

    /// Resolve the input format: extension hint first, then content sniffing.
    pub fn detect(&self, content: &str, hint: &FormatHint) -> Result<Format> {
        match hint {
            FormatHint::Explicit(format) => {
                if self.get(*format).is_some() {
                    return Ok(*format);
                }
                return Err(SnError::unsupported(format!("no codec registered for {format}")));
            }
            FormatHint::Extension(ext) => {
                let by_ext = self
                    .codecs
                    .iter()
                    .find(|c| c.can_parse(&format!("input.{ext}")));
                if let Some(codec) = by_ext {
                    return Ok(codec.format());
                }
                debug!(extension = %ext, "extension not recognized; sniffing content");
            }
            FormatHint::Auto => {}
        }

        self.codecs
            .iter()
            .find(|c| c.detect(content))
            .map(|c| c.format())
            .ok_or_else(|| SnError::unsupported("content matches no registered format"))
    }

    pub fn parse(&self, content: &str, hint: &FormatHint) -> Result<Document> {
        let format = self.detect(content, hint)?;
        let codec = self
            .get(format)
            .ok_or_else(|| SnError::unsupported(format!("no codec registered for {format}")))?;
        let doc = codec.parse(content)?;
        debug!(
            format = %format,
            sections = doc.sections().len(),
            elements = doc.element_count(),
            "parsed document"
        );
        Ok(doc)
    }

    pub fn render(&self, doc: &Document, format: Format) -> Result<String> {
        let codec = self
            .get(format)
            .ok_or_else(|| SnError::unsupported(format!("no renderer registered for {format}")))?;
        codec.render(doc)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
