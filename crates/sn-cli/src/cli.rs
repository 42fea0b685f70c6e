//! Command-line arguments for `specnut`.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use sn_core::{CompressionLevel, Format, FormatHint, TokenScheme};

/// SpecNut - token-reduced digests of specification documents
#[derive(Parser, Debug)]
#[command(name = "specnut")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log filter, e.g. `debug` or `sn_compactor=trace`
    #[arg(long, global = true, env = "SPECNUT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Config file (defaults to ./.specnut.yaml or ./.specnut.yml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a digest of INPUT
    Digest(DigestArgs),

    /// Report token metrics for INPUT without writing a digest
    Metrics(MetricsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Source document, or `-` for stdin
    pub input: PathBuf,

    /// Compression level
    #[arg(long, short, value_parser = parse_level, default_value = "medium")]
    pub level: CompressionLevel,

    /// Input format (detected from extension and content when omitted)
    #[arg(long = "from", value_enum)]
    pub input_format: Option<FormatArg>,

    /// Token counting scheme (overrides the config file)
    #[arg(long, value_parser = parse_scheme)]
    pub scheme: Option<TokenScheme>,
}

impl InputArgs {
    pub fn reads_stdin(&self) -> bool {
        self.input == Path::new("-")
    }

    pub fn format_hint(&self) -> FormatHint {
        match self.input_format.and_then(FormatArg::format) {
            Some(format) => FormatHint::Explicit(format),
            None if self.reads_stdin() => FormatHint::Auto,
            None => FormatHint::from_path(&self.input),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct DigestArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output file (stdout when omitted)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Output format; `auto` follows the output extension, then the input format
    #[arg(long, short, value_enum, default_value = "auto")]
    pub format: FormatArg,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,

    /// Report what would be written without writing it
    #[arg(long, short = 'd')]
    pub dry_run: bool,

    /// Print the metrics table to stderr afterwards
    #[arg(long, short = 'm')]
    pub show_metrics: bool,

    /// Fail with exit code 3 when the reduction is below this fraction
    #[arg(long, value_parser = parse_fraction)]
    pub min_reduction: Option<f64>,
}

impl DigestArgs {
    /// Explicit output format, if one can be decided before parsing.
    pub fn output_format(&self) -> Option<Format> {
        self.format.format().or_else(|| {
            self.output
                .as_deref()
                .and_then(|p| p.extension())
                .and_then(|e| e.to_str())
                .and_then(Format::from_extension)
        })
    }
}

#[derive(Args, Debug, Clone)]
pub struct MetricsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Print metrics as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Auto,
    Markdown,
    Yaml,
    Json,
    Compact,
}

impl FormatArg {
    pub fn format(self) -> Option<Format> {
        match self {
            Self::Auto => None,
            Self::Markdown => Some(Format::Markdown),
            Self::Yaml => Some(Format::Yaml),
            Self::Json => Some(Format::Json),
            Self::Compact => Some(Format::Compact),
        }
    }
}

pub(crate) fn parse_level(s: &str) -> Result<CompressionLevel, String> {
    s.parse::<CompressionLevel>().map_err(|_| {
        format!("invalid level '{s}' (expected one of: low, medium, high)")
    })
}

pub(crate) fn parse_scheme(s: &str) -> Result<TokenScheme, String> {
    s.parse::<TokenScheme>().map_err(|_| {
        let known: Vec<&str> = TokenScheme::all().iter().map(TokenScheme::name).collect();
        format!("invalid scheme '{s}' (expected one of: {})", known.join(", "))
    })
}

pub(crate) fn parse_fraction(s: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(value) if (0.0..=1.0).contains(&value) => Ok(value),
        _ => Err(format!("invalid fraction '{s}' (expected a number between 0 and 1)")),
    }
}
