//! Tracing setup.
//!
//! The TUI owns stdout/stderr while it runs, so its logs go to a file through
//! a non-blocking appender. Line-mode commands log to stderr. Either way the
//! filter comes from `WINDY_LOG` (an `EnvFilter` directive string).

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

pub const LOG_ENV: &str = "WINDY_LOG";
pub const LOG_FILE_NAME: &str = "windy.log";

/// Keeps the file writer flushing until dropped.
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

pub fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join("windy")
}

/// Default filter for line-mode commands, whose stdout is the real output.
pub const STDERR_DEFAULT_LEVEL: &str = "warn";
/// Default filter for the TUI log file.
pub const FILE_DEFAULT_LEVEL: &str = "info";

fn build_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Log to stderr (default level `warn`).
pub fn init_stderr() -> LoggingGuard {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();
    tracing_subscriber::registry()
        .with(build_filter(STDERR_DEFAULT_LEVEL))
        .with(layer)
        .try_init()
        .ok();
    LoggingGuard { _file: None }
}

/// Log to `<log_dir>/windy.log` (default level `info`).
///
/// If the directory cannot be created, a notice goes to stderr (the terminal
/// is not yet in raw mode) and logging is disabled rather than failing the TUI.
pub fn init_file(log_dir: &Path) -> LoggingGuard {
    if let Err(err) = std::fs::create_dir_all(log_dir) {
        tracing_subscriber::registry()
            .with(EnvFilter::new("off"))
            .try_init()
            .ok();
        eprintln!("windy: file logging disabled ({}): {err}", log_dir.display());
        return LoggingGuard { _file: None };
    }

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .compact();

    tracing_subscriber::registry()
        .with(build_filter(FILE_DEFAULT_LEVEL))
        .with(layer)
        .try_init()
        .ok();

    tracing::info!(dir = %log_dir.display(), "file logging enabled");
    LoggingGuard { _file: Some(guard) }
}
