use sn_core::{Document, Format, Result};

/// Capability interface implemented once per document format.
pub trait FormatCodec: Send + Sync {
    /// Format tag this codec handles.
    fn format(&self) -> Format;

    /// Content sniffing; called only when no extension hint resolved the format.
    fn detect(&self, content: &str) -> bool;

    /// Parse raw text into a Document with section paths assigned.
    fn parse(&self, content: &str) -> Result<Document>;

    /// Serialize a Document; output must parse back to the same elements.
    fn render(&self, doc: &Document) -> Result<String>;

    /// Supported file extensions.
    fn supported_extensions(&self) -> Vec<String> {
        self.format()
            .extensions()
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect()
    }

    /// Check if a file can be parsed.
    fn can_parse(&self, path: &str) -> bool {
        let ext = std::path::Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        let ext_with_dot = format!(".{}", ext.to_ascii_lowercase());
        self.supported_extensions().contains(&ext_with_dot)
    }
}
