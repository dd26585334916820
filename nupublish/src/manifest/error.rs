//! Error types for manifest rendering.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::ManifestField;

/// Result type for manifest operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while loading or rendering a manifest template.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template file does not exist.
    #[error("manifest template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// The template file exists but could not be read.
    #[error("failed to read manifest template {}: {source}", path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    /// A field the render needs to replace is not present in the template.
    #[error("template has no {field} element to replace")]
    MissingField { field: ManifestField },

    /// A field appears more than once, so the replacement would be ambiguous.
    #[error("template has {count} {field} elements, expected exactly one")]
    DuplicateField { field: ManifestField, count: usize },

    /// The rendered text does not contain the expected element.
    #[error("{field} substitution did not produce the expected element")]
    SubstitutionFailed { field: ManifestField },
}
