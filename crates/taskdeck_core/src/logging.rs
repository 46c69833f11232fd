//! File logging for long-lived processes.
//!
//! # Responsibility
//! - Configure `flexi_logger` once per process: rotated files under a
//!   caller-chosen directory, one `key=value` event per line.
//! - Route panics into the log so crashes leave a trace.
//!
//! # Invariants
//! - Repeated init with the same level and directory is a no-op;
//!   conflicting settings are reported, never silently applied.
//! - Log lines stay single-line; embedded newlines are flattened.

use flexi_logger::{Cleanup, Criterion, DeferredNow, FileSpec, Logger, LoggerHandle, Naming};
use log::Record;
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const LOG_FILE_BASENAME: &str = "taskdeck";

const LOG_ROTATE_BYTES: u64 = 10_000_000;
const LOG_KEEP_FILES: usize = 5;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    dir: PathBuf,
    handle: LoggerHandle,
}

#[derive(Debug)]
pub enum LoggingError {
    /// Level string is not one of trace/debug/info/warn/error.
    UnsupportedLevel(String),
    /// Target directory cannot be used for log files.
    InvalidLogDir(String),
    /// Logging is already active at a different level.
    LevelConflict {
        active: &'static str,
        requested: &'static str,
    },
    /// Logging is already writing to a different directory.
    DirConflict { active: PathBuf, requested: PathBuf },
    /// The logging backend refused to start.
    Backend(String),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(f, "unsupported log level `{level}`"),
            Self::InvalidLogDir(reason) => write!(f, "invalid log directory: {reason}"),
            Self::LevelConflict { active, requested } => write!(
                f,
                "logging already active at level `{active}`, requested `{requested}`"
            ),
            Self::DirConflict { active, requested } => write!(
                f,
                "logging already writing to {}, requested {}",
                active.display(),
                requested.display()
            ),
            Self::Backend(reason) => write!(f, "logging backend error: {reason}"),
        }
    }
}

impl Error for LoggingError {}

/// Snapshot of the active logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingStatus {
    pub level: &'static str,
    pub directory: PathBuf,
}

pub fn default_log_level() -> &'static str {
    "info"
}

/// Starts file logging, or verifies it already runs with these settings.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), LoggingError> {
    let level = normalize_level(level)?;
    if log_dir.as_os_str().is_empty() {
        return Err(LoggingError::InvalidLogDir(
            "log directory path is empty".to_string(),
        ));
    }
    if log_dir.is_file() {
        return Err(LoggingError::InvalidLogDir(format!(
            "{} is a file",
            log_dir.display()
        )));
    }

    if let Some(state) = LOGGING_STATE.get() {
        if state.level != level {
            return Err(LoggingError::LevelConflict {
                active: state.level,
                requested: level,
            });
        }
        if state.dir != log_dir {
            return Err(LoggingError::DirConflict {
                active: state.dir.clone(),
                requested: log_dir.to_path_buf(),
            });
        }
        return Ok(());
    }

    let handle = Logger::try_with_str(level)
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(LOG_ROTATE_BYTES),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(LOG_KEEP_FILES),
        )
        .format(event_line_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    let _ = LOGGING_STATE.set(LoggingState {
        level,
        dir: log_dir.to_path_buf(),
        handle,
    });

    std::panic::set_hook(Box::new(|panic_info| {
        let message = sanitize_message(&panic_info.to_string());
        log::error!("event=panic module=process message=\"{message}\"");
    }));

    Ok(())
}

pub fn logging_status() -> Option<LoggingStatus> {
    LOGGING_STATE.get().map(|state| LoggingStatus {
        level: state.level,
        directory: state.dir.clone(),
    })
}

/// Flushes buffered log lines, for use right before process exit.
pub fn flush_logs() {
    if let Some(state) = LOGGING_STATE.get() {
        state.handle.flush();
    }
}

fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" => Ok("warn"),
        "error" => Ok("error"),
        _ => Err(LoggingError::UnsupportedLevel(level.to_string())),
    }
}

fn event_line_format(
    w: &mut dyn Write,
    now: &mut DeferredNow,
    record: &Record<'_>,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} [{}] {}",
        now.format("%Y-%m-%dT%H:%M:%S%.3f%z"),
        record.level(),
        record.module_path().unwrap_or("unknown"),
        record.args()
    )
}

fn sanitize_message(message: &str) -> String {
    message.replace(['\n', '\r'], " ").replace('"', "'")
}

#[cfg(test)]
mod tests {
    use super::{normalize_level, sanitize_message, LoggingError};

    #[test]
    fn levels_normalize_case_insensitively() {
        assert_eq!(normalize_level("INFO").unwrap(), "info");
        assert_eq!(normalize_level("  Warn ").unwrap(), "warn");
    }

    #[test]
    fn unknown_levels_are_rejected() {
        assert!(matches!(
            normalize_level("chatty"),
            Err(LoggingError::UnsupportedLevel(_))
        ));
    }

    #[test]
    fn panic_messages_stay_on_one_line() {
        let flattened = sanitize_message("boom\nat \"src/lib.rs\"\r\nline 3");
        assert!(!flattened.contains('\n'));
        assert!(!flattened.contains('"'));
    }
}
