//! Subcommand handlers. All file I/O of the tool happens here.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use sn_compactor::{generate_digest, parse, Digest, DigestConfig, DigestRequest, Metrics};
use sn_core::DigestMetadata;
use tracing::{debug, info};

use crate::cli::{Cli, Commands, DigestArgs, InputArgs, MetricsArgs};
use crate::exit::CliError;

pub fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref(), &current_dir()?)?;
    match &cli.command {
        Commands::Digest(args) => run_digest(args, &config, &mut std::io::stdout().lock()),
        Commands::Metrics(args) => run_metrics(args, &config, &mut std::io::stdout().lock()),
    }
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().context("failed to resolve working directory")
}

/// Explicit path, else the first config file found in `dir`, else defaults.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<DigestConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => DigestConfig::discover(dir),
    };
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            DigestConfig::load(&path)
                .with_context(|| format!("failed to load config {}", path.display()))
        }
        None => Ok(DigestConfig::default()),
    }
}

fn read_input(args: &InputArgs) -> Result<String> {
    if args.reads_stdin() {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))
}

fn digest_for(args: &InputArgs, output: Option<sn_core::Format>, config: &DigestConfig) -> Result<Digest> {
    let raw = read_input(args)?;
    digest_text(&raw, args, output, config)
}

fn digest_text(raw: &str, args: &InputArgs, output: Option<sn_core::Format>, config: &DigestConfig) -> Result<Digest> {
    let mut request = DigestRequest::new(args.level, Utc::now());
    if let Some(format) = output {
        request = request.with_output_format(format);
    }
    if let Some(scheme) = args.scheme {
        request = request.with_scheme(scheme);
    }
    let digest = generate_digest(raw, &args.format_hint(), &request, config)
        .with_context(|| format!("failed to digest {}", args.input.display()))?;
    Ok(digest)
}

pub fn run_digest(args: &DigestArgs, config: &DigestConfig, stdout: &mut dyn Write) -> Result<()> {
    if let Some(path) = &args.output {
        if path.exists() && !args.force && !args.dry_run {
            return Err(CliError::OutputExists(path.clone()).into());
        }
    }

    let digest = digest_for(&args.input, args.output_format(), config)?;

    if let Some(required) = args.min_reduction {
        if digest.metrics.reduction < required {
            return Err(CliError::InsufficientReduction {
                achieved: digest.metrics.reduction_percent(),
                required: required * 100.0,
            }
            .into());
        }
    }

    if args.dry_run {
        let target = match &args.output {
            Some(path) => path.display().to_string(),
            None => "stdout".to_string(),
        };
        let summary = format!(
            "dry run: would write {} digest to {target}\n{}",
            digest.format,
            metrics_table(&digest.metrics)
        );
        stdout
            .write_all(summary.as_bytes())
            .context("failed to write dry-run summary")?;
        return Ok(());
    }

    match &args.output {
        Some(path) => {
            std::fs::write(path, &digest.content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(
                output = %path.display(),
                stages = ?digest.stages_applied,
                "digest written"
            );
        }
        None => {
            stdout
                .write_all(digest.content.as_bytes())
                .context("failed to write digest to stdout")?;
        }
    }

    if args.show_metrics {
        eprint!("{}", metrics_table(&digest.metrics));
    }
    Ok(())
}

/// Report on a saved digest from its embedded metadata, or digest a source
/// document and report on the result.
pub fn run_metrics(args: &MetricsArgs, config: &DigestConfig, stdout: &mut dyn Write) -> Result<()> {
    let raw = read_input(&args.input)?;
    let doc = parse(&raw, &args.input.format_hint())
        .with_context(|| format!("failed to parse {}", args.input.input.display()))?;

    let report = match DigestMetadata::from_document(&doc) {
        Some(metadata) => {
            debug!(level = %metadata.compression_level, "reading metrics from digest metadata");
            stored_report(&metadata, args.json)?
        }
        None => {
            let digest = digest_text(&raw, &args.input, None, config)?;
            if args.json {
                let mut json = digest.metrics.to_json().context("failed to serialize metrics")?;
                json.push('\n');
                json
            } else {
                metrics_table(&digest.metrics)
            }
        }
    };
    stdout
        .write_all(report.as_bytes())
        .context("failed to write metrics to stdout")?;
    Ok(())
}

fn stored_report(metadata: &DigestMetadata, json: bool) -> Result<String> {
    let metrics = Metrics::from_metadata(metadata);
    if json {
        let mut value = serde_json::to_value(&metrics).context("failed to serialize metrics")?;
        if let Some(fields) = value.as_object_mut() {
            fields.insert(
                "digest".into(),
                serde_json::to_value(metadata).context("failed to serialize digest metadata")?,
            );
        }
        let mut out = serde_json::to_string_pretty(&value).context("failed to serialize metrics")?;
        out.push('\n');
        return Ok(out);
    }
    Ok(format!(
        "digest: {} level, generated {}\n{}",
        metadata.compression_level,
        metadata.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        metrics_table(&metrics)
    ))
}

/// Human-readable metrics report.
pub fn metrics_table(metrics: &Metrics) -> String {
    let mut out = format!(
        "scheme: {}\noriginal: {} tokens\nreduced:  {} tokens\nreduction: {:.1}%\n",
        metrics.scheme,
        metrics.original_tokens,
        metrics.reduced_tokens,
        metrics.reduction_percent(),
    );
    if metrics.sections.is_empty() {
        return out;
    }
    out.push('\n');
    out.push_str(&format!(
        "{:<10} {:>8} {:>8} {:>7}  {}\n",
        "action", "original", "reduced", "saved", "section"
    ));
    for section in &metrics.sections {
        out.push_str(&format!(
            "{:<10} {:>8} {:>8} {:>6.1}%  {}\n",
            section.action,
            section.original_tokens,
            section.reduced_tokens,
            section.reduction * 100.0,
            section.path
        ));
    }
    out
}
