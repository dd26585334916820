//! Publish requests built from command-line arguments.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::manifest::{ChangeNotes, ManifestFields};

/// Usage line printed when arguments are missing or invalid.
pub const USAGE: &str = "Arguments are <package-name> <version> <tags> <destination: LOCAL|REMOTE|BOTH> \
[<notes>. Use '-- <entry>' to split notes into bullet points]";

/// Errors raised while validating a publish request.
///
/// All of these are detected before any file is written or any external
/// command is run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Required positional arguments are missing.
    #[error("missing required arguments")]
    Usage,

    /// The destination is not LOCAL, REMOTE or BOTH.
    #[error("invalid destination '{0}': expected LOCAL, REMOTE or BOTH")]
    InvalidDestination(String),

    /// The package name is empty or contains path separators.
    #[error("invalid package name '{0}'")]
    InvalidPackageName(String),

    /// The version is not shaped like a package version.
    #[error("invalid version '{0}': expected digits separated by dots, e.g. 1.4.2")]
    InvalidVersion(String),
}

/// Where a built package is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    /// Local filesystem feed only.
    Local,
    /// Remote package source only.
    Remote,
    /// Local feed, then remote source.
    Both,
}

impl Destination {
    /// All destinations with a short description, for help output.
    pub const ALL: [(Destination, &'static str); 3] = [
        (Destination::Local, "Saves packages to the local feed only"),
        (Destination::Remote, "Pushes packages to the remote source only"),
        (Destination::Both, "Saves to the local feed, then pushes to the remote source"),
    ];

    /// Whether the local feed receives the package.
    pub fn includes_local(self) -> bool {
        matches!(self, Destination::Local | Destination::Both)
    }

    /// Whether the remote source receives the package.
    pub fn includes_remote(self) -> bool {
        matches!(self, Destination::Remote | Destination::Both)
    }

    /// Upper-case name as accepted on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Destination::Local => "LOCAL",
            Destination::Remote => "REMOTE",
            Destination::Both => "BOTH",
        }
    }
}

impl FromStr for Destination {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LOCAL" => Ok(Destination::Local),
            "REMOTE" => Ok(Destination::Remote),
            "BOTH" => Ok(Destination::Both),
            _ => Err(RequestError::InvalidDestination(s.to_string())),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn version_shape() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Up to four numeric parts with an optional pre-release suffix
        Regex::new(r"^\d+(\.\d+){0,3}(-[0-9A-Za-z][0-9A-Za-z.\-]*)?$")
            .expect("valid version shape pattern")
    })
}

/// Check whether a string is shaped like a package version.
pub fn is_version_shaped(version: &str) -> bool {
    version_shape().is_match(version)
}

/// A validated request to publish one package version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    package: String,
    version: String,
    tags: String,
    destination: Destination,
    notes: Option<ChangeNotes>,
}

impl PublishRequest {
    /// Build a request from positional arguments (program name excluded):
    /// `<package> <version> <tags> <destination> [<notes>]`.
    ///
    /// Extra arguments after the notes are ignored.
    ///
    /// # Errors
    ///
    /// [`RequestError::Usage`] when fewer than four arguments are given,
    /// otherwise the first validation failure.
    pub fn from_args<I, S>(args: I) -> Result<Self, RequestError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        if args.len() < 4 {
            return Err(RequestError::Usage);
        }

        let destination: Destination = args[3].parse()?;
        Self::new(&args[0], &args[1], &args[2], destination, args.get(4).map(String::as_str))
    }

    /// Build a request from already separated values.
    pub fn new(
        package: &str,
        version: &str,
        tags: &str,
        destination: Destination,
        notes: Option<&str>,
    ) -> Result<Self, RequestError> {
        let package = package.trim();
        if package.is_empty()
            || package.contains(['/', '\\'])
            || package == "."
            || package == ".."
        {
            return Err(RequestError::InvalidPackageName(package.to_string()));
        }

        let version = version.trim();
        if !is_version_shaped(version) {
            return Err(RequestError::InvalidVersion(version.to_string()));
        }

        Ok(Self {
            package: package.to_string(),
            version: version.to_string(),
            tags: tags.trim().to_string(),
            destination,
            notes: notes.and_then(ChangeNotes::parse),
        })
    }

    /// Package identifier.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Version being published.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Tag list.
    pub fn tags(&self) -> &str {
        &self.tags
    }

    /// Selected destination.
    pub fn destination(&self) -> Destination {
        self.destination
    }

    /// Parsed change notes, if any were given.
    pub fn notes(&self) -> Option<&ChangeNotes> {
        self.notes.as_ref()
    }

    /// Field values for rendering the manifest template.
    pub fn manifest_fields(&self) -> ManifestFields {
        ManifestFields::new(&self.version, &self.tags).with_notes(self.notes.clone())
    }
}
