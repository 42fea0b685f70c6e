//! Deterministic token counting.
//!
//! Every scheme maps the same text to the same count forever; digest metadata
//! records which scheme produced a count. The estimate schemes round up, which
//! keeps them sub-additive: `count(a + b) <= count(a) + count(b)`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SnError;

/// Token counting scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenScheme {
    /// ~4 characters per token, rounded up.
    #[default]
    Chars4,
    /// ~3 bytes per token, rounded up.
    Bytes3,
    /// Whitespace-separated words.
    Words,
    /// cl100k_base BPE encoding.
    #[cfg(feature = "tiktoken")]
    Cl100k,
}

impl TokenScheme {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Chars4 => "chars4",
            Self::Bytes3 => "bytes3",
            Self::Words => "words",
            #[cfg(feature = "tiktoken")]
            Self::Cl100k => "cl100k",
        }
    }

    pub fn all() -> Vec<TokenScheme> {
        vec![
            Self::Chars4,
            Self::Bytes3,
            Self::Words,
            #[cfg(feature = "tiktoken")]
            Self::Cl100k,
        ]
    }
}

impl fmt::Display for TokenScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TokenScheme {
    type Err = SnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::all()
            .into_iter()
            .find(|scheme| scheme.name() == wanted)
            .ok_or_else(|| SnError::InvalidConfig(format!("unknown token scheme '{s}'")))
    }
}

/// Count tokens in `text` under `scheme`.
pub fn count(text: &str, scheme: TokenScheme) -> usize {
    if text.is_empty() {
        return 0;
    }
    match scheme {
        TokenScheme::Chars4 => text.chars().count().div_ceil(4),
        TokenScheme::Bytes3 => text.len().div_ceil(3),
        TokenScheme::Words => text.split_whitespace().count(),
        #[cfg(feature = "tiktoken")]
        TokenScheme::Cl100k => bpe::count(text),
    }
}

#[cfg(feature = "tiktoken")]
mod bpe {
    use std::sync::LazyLock;

    static CL100K: LazyLock<Option<tiktoken_rs::CoreBPE>> =
        LazyLock::new(|| tiktoken_rs::cl100k_base().ok());

    pub(super) fn count(text: &str) -> usize {
        match CL100K.as_ref() {
            Some(bpe) => bpe.encode_with_special_tokens(text).len(),
            // Encoder data is bundled with the crate.
            None => text.chars().count().div_ceil(4),
        }
    }
}
