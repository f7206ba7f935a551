//! Logging configuration for the alias-history CLI
//!
//! Compact terminal output and optional file logging using tracing.

use crate::Result;
use alias_history_core::Error;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Crates whose events are shown by default
const CRATES: &[&str] = &[
    "alias_history",
    "alias_history_engine",
    "alias_history_config",
    "alias_history_core",
];

/// Build the default filter directive for `level`
fn default_directive(level: &str) -> String {
    CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the logging system
///
/// # Arguments
/// * `verbose` - Enable debug level logging and timestamps
/// * `log_file` - Optional path to append debug logs to
///
/// `RUST_LOG` overrides the terminal filter.
///
/// # Examples
/// ```ignore
/// // Info level on the terminal
/// init(false, None)?;
///
/// // Debug level plus a log file
/// init(true, Some(Path::new("alias-history.log")))?;
/// ```
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(level)))
        .map_err(|e| Error::Config(format!("Invalid log filter: {e}")))?;

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .with_ansi(true);

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    // No timestamps in normal mode
    if verbose {
        layers.push(stdout_layer.with_filter(env_filter).boxed());
    } else {
        layers.push(stdout_layer.without_time().with_filter(env_filter).boxed());
    }

    if let Some(log_path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .with_filter(LevelFilter::DEBUG);

        layers.push(file_layer.boxed());
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| Error::Message(format!("Failed to initialize logging: {e}")))?;

    Ok(())
}
