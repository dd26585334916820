//! Tracing setup for the command-line tool.
//!
//! Events go to stderr in compact form. When a log directory is configured,
//! they are also written to `nupublish.log` in that directory through a
//! non-blocking writer; keep the returned [`LoggingGuard`] alive until exit so
//! buffered lines are flushed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file name inside the log directory.
pub const LOG_FILE_NAME: &str = "nupublish.log";

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory {}: {source}", path.display())]
    CreateDirectory { path: PathBuf, source: io::Error },

    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Logging options, usually taken from the `[logging]` config section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Level applied to this tool's crates when `RUST_LOG` is unset.
    pub level: String,

    /// Directory for the log file; stderr only when `None`.
    pub directory: Option<PathBuf>,

    /// Force debug output, ignoring `RUST_LOG` and `level`.
    pub verbose: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            verbose: false,
        }
    }
}

impl LoggingConfig {
    /// Path of the log file, if file logging is enabled.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.directory.as_ref().map(|dir| dir.join(LOG_FILE_NAME))
    }
}

/// Keeps the file writer alive. Dropping it flushes pending lines.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Filter directives for the given level.
///
/// The library and the `nupublish` binary share the `nupublish` target
/// prefix, so one directive covers both; other crates stay at `warn`.
pub fn filter_directives(level: &str, verbose: bool) -> String {
    let level = if verbose { "debug" } else { level };
    format!("warn,nupublish={level}")
}

/// Install the global subscriber.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, LoggingError> {
    let filter = if config.verbose {
        EnvFilter::new(filter_directives(&config.level, true))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter_directives(&config.level, false)))
    };

    let stderr_layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_timer(LocalTime::rfc_3339())
        .with_writer(io::stderr);

    let (file_layer, guard) = match &config.directory {
        Some(dir) => {
            ensure_log_dir(dir)?;
            let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_timer(LocalTime::rfc_3339())
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))?;

    Ok(LoggingGuard { _file: guard })
}

fn ensure_log_dir(dir: &Path) -> Result<(), LoggingError> {
    fs::create_dir_all(dir).map_err(|e| LoggingError::CreateDirectory {
        path: dir.to_path_buf(),
        source: e,
    })
}
