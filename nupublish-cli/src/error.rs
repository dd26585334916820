//! CLI error type.

use std::fmt;

use nupublish::config::ConfigError;
use nupublish::logging::LoggingError;
use nupublish::publisher::PublishError;

/// Errors reported by CLI commands. Printed to stderr; the process exits 1.
#[derive(Debug)]
pub enum CliError {
    /// Invalid configuration or command-line value.
    Config(String),

    /// Reading or writing the config file failed.
    ConfigFile(ConfigError),

    /// Logging could not be set up.
    Logging(LoggingError),

    /// The publish pipeline failed.
    Publish(PublishError),

    /// The current directory could not be determined.
    CurrentDir(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Logging(e) => write!(f, "{}", e),
            CliError::Publish(e) => write!(f, "{}", e),
            CliError::CurrentDir(e) => write!(f, "Cannot determine current directory: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Publish(e) => Some(e),
            CliError::CurrentDir(e) => Some(e),
            CliError::Config(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<PublishError> for CliError {
    fn from(e: PublishError) -> Self {
        CliError::Publish(e)
    }
}
