//! Archived manifests of published versions.
//!
//! Every publish writes `{package}.{version}.{ext}` into the history
//! directory. Because the version is part of the filename, the directory is
//! an append-only record of what was published.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use glob::{glob, Pattern};
use semver::{Prerelease, Version};

use super::request::is_version_shaped;
use super::{PublishError, PublishResult};

/// One archived manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Version parsed from the filename.
    pub version: String,

    /// Path to the archived manifest.
    pub path: PathBuf,

    /// Last modification time, if the filesystem reports one.
    pub modified: Option<DateTime<Local>>,
}

/// List the archived manifests of `package`, oldest version first.
///
/// Files whose version part is not version-shaped (for example those of a
/// package whose name merely starts with `package.`) are skipped.
pub fn list_history(
    history_dir: &Path,
    package: &str,
    extension: &str,
) -> PublishResult<Vec<HistoryEntry>> {
    if !history_dir.is_dir() {
        return Ok(Vec::new());
    }

    let pattern = format!(
        "{}/{}.*.{}",
        Pattern::escape(&history_dir.to_string_lossy()),
        Pattern::escape(package),
        Pattern::escape(extension)
    );
    let paths = glob(&pattern).map_err(|e| PublishError::InvalidPath(e.to_string()))?;

    let prefix = format!("{}.", package);
    let suffix = format!(".{}", extension);
    let mut entries = Vec::new();

    for path in paths {
        let path = path.map_err(|e| PublishError::ReadFailed {
            path: e.path().to_path_buf(),
            source: e.into(),
        })?;

        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(version) = filename
            .strip_prefix(&prefix)
            .and_then(|rest| rest.strip_suffix(&suffix))
        else {
            continue;
        };
        if !is_version_shaped(version) {
            continue;
        }

        let modified = path
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Local>::from);

        entries.push(HistoryEntry {
            version: version.to_string(),
            path: path.clone(),
            modified,
        });
    }

    entries.sort_by(|a, b| compare_versions(&a.version, &b.version));
    Ok(entries)
}

/// Order versions by their numeric parts, then by pre-release suffix.
///
/// Three-part versions are compared as semantic versions. NuGet also accepts
/// one, two and four numeric parts, which `semver` rejects, so those fall
/// back to comparing the numeric parts directly; suffixes are still ordered
/// by semver pre-release rules (`beta.2` < `beta.10`). A version without a
/// suffix sorts after the same version with one (`1.0.0-beta` < `1.0.0`).
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    if let (Ok(x), Ok(y)) = (Version::parse(a), Version::parse(b)) {
        return x.cmp(&y);
    }

    let (a_num, a_pre) = split_version(a);
    let (b_num, b_pre) = split_version(b);

    let a_parts: Vec<u64> = a_num.split('.').map(|p| p.parse().unwrap_or(0)).collect();
    let b_parts: Vec<u64> = b_num.split('.').map(|p| p.parse().unwrap_or(0)).collect();
    let len = a_parts.len().max(b_parts.len());

    for i in 0..len {
        let x = a_parts.get(i).copied().unwrap_or(0);
        let y = b_parts.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => {}
            other => return other,
        }
    }

    compare_prerelease(a_pre, b_pre)
}

fn compare_prerelease(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => match (Prerelease::new(x), Prerelease::new(y)) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            // Not valid semver identifiers (e.g. leading zeros)
            _ => x.cmp(y),
        },
    }
}

fn split_version(version: &str) -> (&str, Option<&str>) {
    match version.split_once('-') {
        Some((num, pre)) => (num, Some(pre)),
        None => (version, None),
    }
}
