//! Error types for the publisher module.

use std::fmt;
use std::io;
use std::path::PathBuf;

use super::pipeline::Stage;
use crate::manifest::RenderError;

/// Result type for publisher operations.
pub type PublishResult<T> = Result<T, PublishError>;

/// An external packaging-tool command that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    /// Pipeline stage the command belongs to.
    pub stage: Stage,

    /// The command line as it was run.
    pub command: String,

    /// Exit code, or `None` if the process could not be started or was
    /// terminated by a signal.
    pub exit_code: Option<i32>,

    /// Captured stderr, or the launch error.
    pub reason: String,
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exit_code {
            Some(code) => write!(
                f,
                "{} command `{}` exited with status {}",
                self.stage, self.command, code
            )?,
            None => write!(f, "{} command `{}` failed", self.stage, self.command)?,
        }
        if !self.reason.is_empty() {
            write!(f, ": {}", self.reason)?;
        }
        Ok(())
    }
}

/// Errors that can occur during publishing operations.
#[derive(Debug)]
pub enum PublishError {
    /// The package's manifest template does not exist.
    TemplateNotFound(PathBuf),

    /// The template could not be rendered.
    Render(RenderError),

    /// Failed to create directory.
    CreateDirectoryFailed { path: PathBuf, source: io::Error },

    /// Failed to read file or directory.
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write file.
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to delete a stale or transient file.
    RemoveFailed { path: PathBuf, source: io::Error },

    /// An external command failed.
    CommandFailed(CommandFailure),

    /// The packaging tool executable cannot be launched.
    ToolUnavailable(String),

    /// Invalid path provided.
    InvalidPath(String),
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::TemplateNotFound(path) => {
                write!(f, "manifest template not found: {}", path.display())
            }
            PublishError::Render(e) => {
                write!(f, "failed to render manifest: {}", e)
            }
            PublishError::CreateDirectoryFailed { path, source } => {
                write!(
                    f,
                    "failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            PublishError::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            PublishError::WriteFailed { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            PublishError::RemoveFailed { path, source } => {
                write!(f, "failed to remove {}: {}", path.display(), source)
            }
            PublishError::CommandFailed(failure) => write!(f, "{}", failure),
            PublishError::ToolUnavailable(msg) => {
                write!(f, "packaging tool unavailable: {}", msg)
            }
            PublishError::InvalidPath(msg) => {
                write!(f, "invalid path: {}", msg)
            }
        }
    }
}

impl std::error::Error for PublishError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PublishError::Render(e) => Some(e),
            PublishError::CreateDirectoryFailed { source, .. } => Some(source),
            PublishError::ReadFailed { source, .. } => Some(source),
            PublishError::WriteFailed { source, .. } => Some(source),
            PublishError::RemoveFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<RenderError> for PublishError {
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::TemplateNotFound(path) => PublishError::TemplateNotFound(path),
            other => PublishError::Render(other),
        }
    }
}
