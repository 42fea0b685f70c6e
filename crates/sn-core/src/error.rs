use std::fmt;

use thiserror::Error;

use crate::types::Format;

/// Where in the input a structural parse failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// 1-based line and column.
    LineColumn { line: usize, column: usize },
    /// Path inside an already-parsed tree, e.g. `sections[0].elements[2]`.
    Path(String),
    Unknown,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineColumn { line, column } => write!(f, "line {line}, column {column}"),
            Self::Path(path) => write!(f, "{path}"),
            Self::Unknown => write!(f, "unknown location"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SnError {
    #[error("Unsupported format: {detail}")]
    UnsupportedFormat { detail: String },
    #[error("Malformed {format} input at {location}: {message}")]
    MalformedInput {
        format: Format,
        location: Location,
        message: String,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SnError {
    pub fn unsupported(detail: impl Into<String>) -> Self {
        Self::UnsupportedFormat { detail: detail.into() }
    }

    pub fn malformed(format: Format, location: Location, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            format,
            location,
            message: message.into(),
        }
    }

    /// Failure location, for malformed-input errors.
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::MalformedInput { location, .. } => Some(location),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SnError>;
