//! Digest metadata embedded in rendered output.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::document::{Document, FrontMatter};
use crate::tokenizer::TokenScheme;
use crate::types::CompressionLevel;

/// Version of the digest layout, independent of the tool version.
pub const DIGEST_FORMAT_VERSION: &str = "1.0";

pub const KEY_FORMAT_VERSION: &str = "format_version";
pub const KEY_GENERATED_AT: &str = "generated_at";
pub const KEY_SOURCE_HASH: &str = "source_hash";
pub const KEY_SOURCE_TOKENS: &str = "source_token_count";
pub const KEY_DIGEST_TOKENS: &str = "digest_token_count";
pub const KEY_TOKEN_SCHEME: &str = "token_scheme";
pub const KEY_COMPRESSION_LEVEL: &str = "compression_level";

/// SHA-256 hex digest of the pre-optimization input.
pub fn source_hash(raw_text: &str) -> String {
    format!("{:x}", Sha256::digest(raw_text.as_bytes()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestMetadata {
    pub format_version: String,
    pub source_hash: String,
    pub generated_at: DateTime<Utc>,
    pub source_token_count: usize,
    pub digest_token_count: usize,
    pub token_scheme: TokenScheme,
    pub compression_level: CompressionLevel,
}

impl DigestMetadata {
    pub fn to_front_matter(&self) -> FrontMatter {
        let mut fm = FrontMatter::new();
        fm.insert(KEY_FORMAT_VERSION.into(), self.format_version.clone());
        fm.insert(KEY_SOURCE_HASH.into(), self.source_hash.clone());
        fm.insert(
            KEY_GENERATED_AT.into(),
            self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
        fm.insert(KEY_SOURCE_TOKENS.into(), self.source_token_count.to_string());
        fm.insert(KEY_DIGEST_TOKENS.into(), self.digest_token_count.to_string());
        fm.insert(KEY_TOKEN_SCHEME.into(), self.token_scheme.name().into());
        fm.insert(KEY_COMPRESSION_LEVEL.into(), self.compression_level.name().into());
        fm
    }

    /// Recover metadata from a parsed digest; `None` if any field is missing or unreadable.
    pub fn from_front_matter(fm: &FrontMatter) -> Option<Self> {
        Some(Self {
            format_version: fm.get(KEY_FORMAT_VERSION)?.clone(),
            source_hash: fm.get(KEY_SOURCE_HASH)?.clone(),
            generated_at: DateTime::parse_from_rfc3339(fm.get(KEY_GENERATED_AT)?)
                .ok()?
                .with_timezone(&Utc),
            source_token_count: fm.get(KEY_SOURCE_TOKENS)?.parse().ok()?,
            digest_token_count: fm.get(KEY_DIGEST_TOKENS)?.parse().ok()?,
            token_scheme: fm.get(KEY_TOKEN_SCHEME)?.parse().ok()?,
            compression_level: fm.get(KEY_COMPRESSION_LEVEL)?.parse().ok()?,
        })
    }

    pub fn from_document(doc: &Document) -> Option<Self> {
        Self::from_front_matter(&doc.front_matter)
    }

    /// True when `source_text` no longer matches the hash this digest was built from.
    pub fn is_stale(&self, source_text: &str) -> bool {
        self.source_hash != source_hash(source_text)
    }
}
