use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const CRATES: [&str; 5] = ["specnut", "sn_core", "sn_parser", "sn_classifier", "sn_compactor"];

/// Filter directive for the CLI flags: an explicit level wins over `--verbose`.
pub fn directive(verbose: bool, log_level: Option<&str>) -> String {
    match (verbose, log_level) {
        (_, Some(level)) if level.contains('=') => level.to_string(),
        (_, Some(level)) => scoped(level),
        (true, None) => scoped("debug"),
        (false, None) => scoped("warn"),
    }
}

fn scoped(level: &str) -> String {
    CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the stderr subscriber. `RUST_LOG`, then `SPECNUT_LOG`, override the flags.
pub fn init_tracing(verbose: bool, log_level: Option<&str>, log_json: bool) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("SPECNUT_LOG"))
    {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(directive(verbose, log_level))?,
    };

    let registry = tracing_subscriber::registry().with(filter);

    if log_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}
