use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use std::fs;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppSettings;

/// Where and how verbosely to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingOptions {
    pub log_dir: Utf8PathBuf,
    /// Prefix of the rotated log files (e.g., "resume-builder")
    pub log_prefix: String,
    /// Debug level when true, info otherwise
    pub debug_mode: bool,
    /// Also log to stderr with ANSI colors
    pub console_output: bool,
}

impl LoggingOptions {
    pub fn from_settings(log_dir: Utf8PathBuf, settings: &AppSettings) -> Self {
        Self {
            log_dir,
            log_prefix: crate::APP_NAME.to_string(),
            debug_mode: settings.debug_mode,
            console_output: settings.console_logging,
        }
    }

    fn filter(&self) -> EnvFilter {
        if self.debug_mode {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    }
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            log_dir: Utf8PathBuf::from("logs"),
            log_prefix: crate::APP_NAME.to_string(),
            debug_mode: false,
            console_output: true,
        }
    }
}

/// Setup logging with a daily rotating file appender and optional console output.
///
/// # Returns
/// A guard that must be held for the duration of the program to keep logging active.
/// Fails if the log directory cannot be created or a global subscriber is
/// already installed.
pub fn setup_logging(
    options: &LoggingOptions,
) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = &options.log_dir;
    if !log_dir.exists() {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir))?;
    }

    let file_appender = rolling::daily(log_dir, &options.log_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false) // No ANSI codes in log files
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let console_layer = options.console_output.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
            .boxed()
    });

    tracing_subscriber::registry()
        .with(options.filter())
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(
        "Logging initialized: dir={}, prefix={}, debug={}, console={}",
        log_dir,
        options.log_prefix,
        options.debug_mode,
        options.console_output
    );

    Ok(guard)
}
