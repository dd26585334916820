//! Change notes formatting.
//!
//! Notes are passed on the command line as a single string. A `--` followed by
//! whitespace starts a new bullet, so `"-- Fixed reads -- Added filters"`
//! becomes two list entries:
//!
//! ```text
//! - Fixed reads
//! - Added filters
//! ```
//!
//! Text before the first delimiter is kept as a plain leading line.

use std::sync::OnceLock;

use regex::Regex;

/// Prefix written in front of every bullet line.
pub const BULLET_PREFIX: &str = "- ";

fn bullet_delimiter() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"--\s+").expect("valid bullet delimiter pattern"))
}

/// Change notes split into an optional leading line and bullet entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotes {
    lead: Option<String>,
    bullets: Vec<String>,
}

impl ChangeNotes {
    /// Parse raw notes text.
    ///
    /// Returns `None` when the text is blank, in which case the manifest's
    /// release notes and description are left untouched.
    pub fn parse(text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }

        let mut segments = bullet_delimiter().split(text).map(str::trim);
        let lead = segments
            .next()
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let bullets: Vec<String> = segments
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if lead.is_none() && bullets.is_empty() {
            return None;
        }

        Some(Self { lead, bullets })
    }

    /// The plain line before the first bullet, if any.
    pub fn lead(&self) -> Option<&str> {
        self.lead.as_deref()
    }

    /// The bullet entries without their `- ` prefix.
    pub fn bullets(&self) -> &[String] {
        &self.bullets
    }

    /// Render as text for the `<releaseNotes>` element.
    ///
    /// When the notes open with a bullet the text starts with a newline so the
    /// list begins on its own line inside the element.
    pub fn to_release_notes(&self) -> String {
        let mut out = String::new();
        if let Some(lead) = &self.lead {
            out.push_str(lead);
        }
        for bullet in &self.bullets {
            out.push('\n');
            out.push_str(BULLET_PREFIX);
            out.push_str(bullet);
        }
        out
    }

    /// Render as text appended to the `<description>` element.
    pub fn to_description(&self) -> String {
        self.to_release_notes().trim().to_string()
    }
}
