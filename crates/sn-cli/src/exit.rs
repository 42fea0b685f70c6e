//! Process exit codes and error reports.

use std::path::PathBuf;

use serde_json::json;
use sn_core::SnError;
use thiserror::Error;

/// Failures decided by the CLI itself rather than the library.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("output {} already exists (use --force to overwrite)", .0.display())]
    OutputExists(PathBuf),
    #[error("reduction {achieved:.1}% is below the required {required:.1}%")]
    InsufficientReduction { achieved: f64, required: f64 },
}

/// POSIX-style exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    Failure = 1,
    /// Unsupported format, malformed input or invalid config.
    Validation = 2,
    /// Digest fell short of `--min-reduction`.
    Compression = 3,
    Io = 4,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Classify an error by the first recognised cause in its chain.
    pub fn for_error(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if let Some(sn) = cause.downcast_ref::<SnError>() {
                return Self::for_sn_error(sn);
            }
            if let Some(cli) = cause.downcast_ref::<CliError>() {
                return match cli {
                    CliError::OutputExists(_) => Self::Failure,
                    CliError::InsufficientReduction { .. } => Self::Compression,
                };
            }
            if cause.downcast_ref::<std::io::Error>().is_some() {
                return Self::Io;
            }
        }
        Self::Failure
    }

    fn for_sn_error(err: &SnError) -> Self {
        match err {
            SnError::UnsupportedFormat { .. }
            | SnError::MalformedInput { .. }
            | SnError::InvalidConfig(_) => Self::Validation,
            SnError::Io(_) => Self::Io,
            SnError::Other(inner) => Self::for_error(inner),
        }
    }
}

fn error_kind(err: &anyhow::Error) -> &'static str {
    let sn = err.chain().find_map(|c| c.downcast_ref::<SnError>());
    match sn {
        Some(SnError::UnsupportedFormat { .. }) => "unsupported_format",
        Some(SnError::MalformedInput { .. }) => "malformed_input",
        Some(SnError::InvalidConfig(_)) => "invalid_config",
        Some(SnError::Io(_)) => "io",
        _ => match ExitStatus::for_error(err) {
            ExitStatus::Io => "io",
            ExitStatus::Compression => "insufficient_reduction",
            _ => "error",
        },
    }
}

/// Single-line JSON error envelope for `--log-json` runs.
pub fn error_json(err: &anyhow::Error) -> String {
    let location = err
        .chain()
        .find_map(|c| c.downcast_ref::<SnError>())
        .and_then(SnError::location)
        .map(ToString::to_string);
    json!({
        "error": {
            "code": ExitStatus::for_error(err).code(),
            "kind": error_kind(err),
            "message": format!("{err:#}"),
            "location": location,
        }
    })
    .to_string()
}
