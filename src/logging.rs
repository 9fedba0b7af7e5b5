//! File logging for the TUI
//!
//! ratatui owns the terminal, so everything goes to a daily-rolling file
//! under the data directory and nothing to stdout/stderr.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_FILE_PREFIX: &str = "jobscope.log";

/// Install the global subscriber. `RUST_LOG` wins over `default_level`.
///
/// The returned guard flushes buffered lines on drop and must be held until
/// the process exits.
pub fn init(log_dir: &Path, default_level: &str) -> std::io::Result<WorkerGuard> {
    fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true)
        .with_filter(env_filter);

    // A second init (tests, embedding) keeps the first subscriber
    if tracing_subscriber::registry()
        .with(file_layer)
        .try_init()
        .is_err()
    {
        eprintln!("jobscope: global tracing subscriber already set");
    }

    tracing::info!(
        "logging initialized, writing to {}",
        log_dir.join(LOG_FILE_PREFIX).display()
    );

    Ok(guard)
}
