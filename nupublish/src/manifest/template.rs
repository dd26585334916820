//! Manifest template loading and field substitution.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{NoExpand, Regex};
use tracing::debug;

use super::{ChangeNotes, ManifestField, RenderError, RenderResult};

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<version>[\d.]+</version>").expect("valid version pattern"))
}

fn tags_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<tags>[^\s<]+</tags>").expect("valid tags pattern"))
}

fn release_notes_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"<releaseNotes>[^<]*</releaseNotes>").expect("valid release notes pattern")
    })
}

fn description_close_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Swallow the indentation in front of the closing marker so the appended
    // notes start on a fresh line.
    PATTERN.get_or_init(|| {
        Regex::new(r"\n?[ \t]*</description>").expect("valid description pattern")
    })
}

impl ManifestField {
    fn pattern(self) -> &'static Regex {
        match self {
            ManifestField::Version => version_pattern(),
            ManifestField::Tags => tags_pattern(),
            ManifestField::ReleaseNotes => release_notes_pattern(),
            ManifestField::Description => description_close_pattern(),
        }
    }
}

/// Values substituted into a manifest template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFields {
    /// Package version, e.g. `1.4.2`.
    pub version: String,

    /// Tag list, inserted verbatim.
    pub tags: String,

    /// Optional change notes for the release notes and description.
    pub notes: Option<ChangeNotes>,
}

impl ManifestFields {
    /// Create fields without change notes.
    pub fn new(version: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            tags: tags.into(),
            notes: None,
        }
    }

    /// Attach change notes.
    pub fn with_notes(mut self, notes: Option<ChangeNotes>) -> Self {
        self.notes = notes;
        self
    }
}

/// A manifest template read from disk.
#[derive(Debug, Clone)]
pub struct ManifestTemplate {
    path: Option<PathBuf>,
    text: String,
}

impl ManifestTemplate {
    /// Load a template from a file.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::TemplateNotFound`] when the file does not exist
    /// and [`RenderError::ReadFailed`] for any other I/O error.
    pub fn load(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => RenderError::TemplateNotFound(path.to_path_buf()),
            _ => RenderError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        debug!(path = %path.display(), bytes = text.len(), "Loaded manifest template");

        Ok(Self {
            path: Some(path.to_path_buf()),
            text,
        })
    }

    /// Create a template from in-memory text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            path: None,
            text: text.into(),
        }
    }

    /// The file the template was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The raw template text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Render the template with the given field values.
    ///
    /// The version and tags elements are always replaced. The release notes
    /// element is replaced and the description extended only when notes are
    /// present. Rendering is a pure function of the template text and the
    /// fields.
    ///
    /// # Errors
    ///
    /// Fails when a field to be replaced is missing or appears more than once,
    /// or when the rendered text does not contain the expected element.
    pub fn render(&self, fields: &ManifestFields) -> RenderResult<String> {
        let mut rendered = replace_field(
            &self.text,
            ManifestField::Version,
            &format!("<version>{}</version>", fields.version),
        )?;

        rendered = replace_field(
            &rendered,
            ManifestField::Tags,
            &format!("<tags>{}</tags>", fields.tags),
        )?;

        if let Some(notes) = &fields.notes {
            rendered = replace_field(
                &rendered,
                ManifestField::ReleaseNotes,
                &format!("<releaseNotes>{}\n</releaseNotes>", notes.to_release_notes()),
            )?;

            rendered = replace_field(
                &rendered,
                ManifestField::Description,
                &format!("\n{}\n</description>", notes.to_description()),
            )?;
        }

        Ok(rendered)
    }
}

/// Replace the single occurrence of `field` in `text` with `replacement`.
fn replace_field(text: &str, field: ManifestField, replacement: &str) -> RenderResult<String> {
    let pattern = field.pattern();

    match pattern.find_iter(text).count() {
        0 => return Err(RenderError::MissingField { field }),
        1 => {}
        count => return Err(RenderError::DuplicateField { field, count }),
    }

    let rendered = pattern.replacen(text, 1, NoExpand(replacement)).into_owned();

    if !rendered.contains(replacement) {
        return Err(RenderError::SubstitutionFailed { field });
    }

    Ok(rendered)
}
