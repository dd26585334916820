//! Manifest template rendering.
//!
//! A package's manifest is kept as a template (`_<package>.nuspec.base`) whose
//! `<version>`, `<tags>`, `<releaseNotes>` and `<description>` elements are
//! rewritten for every release. Substitution is regex based, so every field
//! is checked before and after replacement: a template edit that breaks a
//! pattern fails the render instead of silently producing a stale manifest.
//!
//! # Example
//!
//! ```
//! use nupublish::manifest::{ChangeNotes, ManifestFields, ManifestTemplate};
//!
//! let template = ManifestTemplate::from_text(
//!     "<version>0.0.1</version>\n<tags>demo</tags>\n\
//!      <description>\n  Demo.\n  </description>\n<releaseNotes>None</releaseNotes>",
//! );
//! let fields = ManifestFields::new("1.2.0", "demo,tools")
//!     .with_notes(ChangeNotes::parse("-- Added filters -- Fixed reads"));
//!
//! let rendered = template.render(&fields).unwrap();
//! assert!(rendered.contains("<version>1.2.0</version>"));
//! assert!(rendered.contains("<releaseNotes>\n- Added filters\n- Fixed reads\n</releaseNotes>"));
//! ```

mod error;
mod notes;
mod template;

use std::fmt;

pub use error::{RenderError, RenderResult};
pub use notes::{ChangeNotes, BULLET_PREFIX};
pub use template::{ManifestFields, ManifestTemplate};

/// Template elements rewritten during a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestField {
    Version,
    Tags,
    ReleaseNotes,
    Description,
}

impl ManifestField {
    /// Element name as it appears in the manifest.
    pub fn element_name(self) -> &'static str {
        match self {
            ManifestField::Version => "version",
            ManifestField::Tags => "tags",
            ManifestField::ReleaseNotes => "releaseNotes",
            ManifestField::Description => "description",
        }
    }
}

impl fmt::Display for ManifestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.element_name())
    }
}
