use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::SnError;

/// Document formats understood by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Markdown,
    Yaml,
    Json,
    /// Line-oriented digest format.
    Compact,
}

impl Format {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Compact => "compact",
        }
    }

    /// File extensions (without dot) that hint at this format.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Markdown => &["md", "markdown"],
            Self::Yaml => &["yaml", "yml"],
            Self::Json => &["json"],
            Self::Compact => &["snc"],
        }
    }

    pub fn from_extension(ext: &str) -> Option<Format> {
        let ext = ext.trim_start_matches('.').to_lowercase();
        Self::all()
            .into_iter()
            .find(|f| f.extensions().contains(&ext.as_str()))
    }

    pub fn all() -> [Format; 4] {
        [Self::Markdown, Self::Yaml, Self::Json, Self::Compact]
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = SnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(SnError::unsupported(format!("unknown format '{other}'"))),
        }
    }
}

/// How the caller wants the input format resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormatHint {
    /// Sniff the content.
    #[default]
    Auto,
    /// File extension first, content sniffing if it maps to nothing.
    Extension(String),
    /// No detection at all.
    Explicit(Format),
}

impl FormatHint {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => Self::Extension(ext.to_string()),
            None => Self::Auto,
        }
    }
}

impl From<Format> for FormatHint {
    fn from(format: Format) -> Self {
        Self::Explicit(format)
    }
}

/// Element type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Paragraph,
    ListItem,
    CodeBlock,
    TableRow,
    KeyValue,
    Requirement,
    AcceptanceCriterion,
}

impl ElementKind {
    /// Short tag used by the structured and compact encodings.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Paragraph => "p",
            Self::ListItem => "li",
            Self::CodeBlock => "code",
            Self::TableRow => "row",
            Self::KeyValue => "kv",
            Self::Requirement => "req",
            Self::AcceptanceCriterion => "ac",
        }
    }

    pub fn from_tag(tag: &str) -> Option<ElementKind> {
        Self::all().into_iter().find(|k| k.tag() == tag)
    }

    pub fn all() -> [ElementKind; 7] {
        [
            Self::Paragraph,
            Self::ListItem,
            Self::CodeBlock,
            Self::TableRow,
            Self::KeyValue,
            Self::Requirement,
            Self::AcceptanceCriterion,
        ]
    }
}

/// Importance tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Critical = 0,
    Important = 1,
    Optional = 2,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Critical => "critical",
            Self::Important => "important",
            Self::Optional => "optional",
        })
    }
}

/// Compression level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// Drops optional content only.
    Low,
    /// + merges adjacent important list items.
    #[default]
    Medium,
    /// + truncates long important elements.
    High,
}

impl CompressionLevel {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn all() -> [CompressionLevel; 3] {
        [Self::Low, Self::Medium, Self::High]
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompressionLevel {
    type Err = SnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(SnError::InvalidConfig(format!("unknown compression level '{other}'"))),
        }
    }
}
