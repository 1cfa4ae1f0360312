//! Logging setup.
//!
//! One-shot commands log to stderr. The watch TUI owns the terminal, so it
//! logs to `<work_dir>/.dockside/dockside.log` instead.

use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Overrides the configured level, e.g. `DOCKSIDE_LOG=dockside=trace`.
pub const LOG_ENV: &str = "DOCKSIDE_LOG";

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const LOG_FILE_NAME: &str = "dockside.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File,
}

/// Normalise a user-supplied level, falling back to `info`.
pub fn parse_level(value: &str) -> String {
    match value.to_lowercase().as_str() {
        "trace" => "trace".to_string(),
        "debug" => "debug".to_string(),
        "info" => "info".to_string(),
        "warn" | "warning" => "warn".to_string(),
        "error" => "error".to_string(),
        "off" | "none" | "disabled" => "off".to_string(),
        _ => DEFAULT_LOG_LEVEL.to_string(),
    }
}

pub fn log_directory(work_dir: &Path) -> PathBuf {
    work_dir.join(".dockside")
}

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(parse_level(level)))
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; hold it for the life
/// of the process. `None` for stderr logging.
pub fn init(target: LogTarget, level: &str, work_dir: &Path) -> io::Result<Option<WorkerGuard>> {
    match target {
        LogTarget::Stderr => {
            let layer = fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .compact();
            // A subscriber may already be installed (tests, embedding).
            let _ = tracing_subscriber::registry()
                .with(filter(level))
                .with(layer)
                .try_init();
            Ok(None)
        }
        LogTarget::File => {
            let dir = log_directory(work_dir);
            std::fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            let _ = tracing_subscriber::registry()
                .with(filter(level))
                .with(layer)
                .try_init();
            tracing::info!(path = %dir.join(LOG_FILE_NAME).display(), "logging initialized");
            Ok(Some(guard))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_normalises() {
        assert_eq!(parse_level("DEBUG"), "debug");
        assert_eq!(parse_level("warning"), "warn");
        assert_eq!(parse_level("none"), "off");
        assert_eq!(parse_level("loud"), DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn log_directory_is_under_work_dir() {
        assert_eq!(
            log_directory(Path::new("/srv/app")),
            PathBuf::from("/srv/app/.dockside")
        );
    }
}
