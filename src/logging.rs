//! Tracing subscriber setup for the `schoolsync` binary.

use std::fs::File;

use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming a log file. Unset means stderr.
pub const LOG_PATH_ENV: &str = "SCHOOLSYNC_LOG";

/// Where log lines go.
#[derive(Debug)]
enum LogTarget {
    Stderr,
    File(File),
}

/// Resolve the log target from the value of `SCHOOLSYNC_LOG`.
///
/// A file that cannot be opened falls back to stderr, with the reason.
fn log_target(log_path: Option<&str>) -> (LogTarget, Option<String>) {
    let Some(path) = log_path else {
        return (LogTarget::Stderr, None);
    };
    match std::fs::OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => (LogTarget::File(file), None),
        Err(e) => (
            LogTarget::Stderr,
            Some(format!("Failed to open log file {}: {}", path, e)),
        ),
    }
}

/// Initialize tracing.
///
/// The level comes from `RUST_LOG` (default `info`). Output goes to stderr
/// so stdout stays clean JSON, unless `SCHOOLSYNC_LOG` names a file. If
/// that file cannot be opened, logging falls back to stderr.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_path = std::env::var(LOG_PATH_ENV).ok();
    let (target, open_error) = log_target(log_path.as_deref());

    match target {
        LogTarget::Stderr => {
            let stderr_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_timer(UtcTime::rfc_3339())
                .with_target(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
        }
        LogTarget::File(file) => {
            let file_layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_timer(UtcTime::rfc_3339())
                .with_target(true)
                .with_level(true);
            tracing_subscriber::registry()
                .with(filter)
                .with(file_layer)
                .init();
        }
    }

    if let Some(reason) = open_error {
        tracing::warn!("{}, logging to stderr", reason);
    }
}
