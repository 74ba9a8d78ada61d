//! Log setup: console (stderr) plus a log file

use anyhow::{Context, Result};
use dbwatch_config::LoggingSettings;
use dbwatch_util::resolve_log_path;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging. Returns the log file path.
///
/// `RUST_LOG` wins over `level`.
pub fn init_logging(settings: &LoggingSettings, log_dir: &Path, level: &str) -> Result<PathBuf> {
    let log_path = resolve_log_path(log_dir, &settings.file);
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {:?}", parent))?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console = fmt::layer().with_writer(std::io::stderr).with_target(true);

    let (json_file, plain_file) = if settings.json {
        (
            Some(
                fmt::layer()
                    .json()
                    .with_writer(Mutex::new(file))
                    .with_current_span(false),
            ),
            None,
        )
    } else {
        (
            None,
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false),
            ),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(json_file)
        .with(plain_file)
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(log_path)
}
