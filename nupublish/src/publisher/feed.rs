//! Local package feed directories.
//!
//! A local feed is a plain directory tree the packaging tool treats as a
//! package source:
//!
//! ```text
//! <feed root>/
//! ├── SharpWrap/          one directory per package, created on first publish
//! └── SharpWrapTools/
//! ```
//!
//! The first publish of a package into the feed requires a one-time `init`
//! run before packages can be added. The package directory is created once
//! that init succeeds, so [`LocalFeed::has_package`] tells whether it is
//! still needed.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::{PublishError, PublishResult};

/// A filesystem package feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFeed {
    root: PathBuf,
}

impl LocalFeed {
    /// Create a handle for the feed rooted at `root`. Nothing is created yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the feed.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of a package within the feed.
    pub fn package_dir(&self, package: &str) -> PathBuf {
        self.root.join(package)
    }

    /// Check whether a package already has a directory in the feed.
    pub fn has_package(&self, package: &str) -> bool {
        self.package_dir(package).is_dir()
    }

    /// Create the feed root if it does not exist.
    ///
    /// Returns `true` if the root was created by this call.
    pub fn ensure_root(&self) -> PublishResult<bool> {
        if self.root.is_dir() {
            return Ok(false);
        }

        info!(path = %self.root.display(), "Creating local feed root");
        fs::create_dir_all(&self.root).map_err(|e| PublishError::CreateDirectoryFailed {
            path: self.root.clone(),
            source: e,
        })?;
        Ok(true)
    }

    /// Create the package's directory if it does not exist.
    ///
    /// Returns `true` if the directory was created by this call, meaning the
    /// package has never been published to this feed.
    pub fn ensure_package_dir(&self, package: &str) -> PublishResult<bool> {
        let dir = self.package_dir(package);
        if dir.is_dir() {
            return Ok(false);
        }

        info!(package, path = %dir.display(), "Creating local feed package directory");
        fs::create_dir_all(&dir).map_err(|e| PublishError::CreateDirectoryFailed {
            path: dir.clone(),
            source: e,
        })?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_root_creates_once() {
        let temp = TempDir::new().unwrap();
        let feed = LocalFeed::new(temp.path().join("feed"));

        assert!(feed.ensure_root().unwrap());
        assert!(feed.root().is_dir());
        assert!(!feed.ensure_root().unwrap());
    }

    #[test]
    fn test_ensure_package_dir_reports_first_use() {
        let temp = TempDir::new().unwrap();
        let feed = LocalFeed::new(temp.path().join("feed"));
        feed.ensure_root().unwrap();

        assert!(!feed.has_package("SharpWrap"));
        assert!(feed.ensure_package_dir("SharpWrap").unwrap());
        assert!(feed.has_package("SharpWrap"));
        assert!(!feed.ensure_package_dir("SharpWrap").unwrap());
    }

    #[test]
    fn test_package_dirs_are_independent() {
        let temp = TempDir::new().unwrap();
        let feed = LocalFeed::new(temp.path());

        assert!(feed.ensure_package_dir("A").unwrap());
        assert!(feed.ensure_package_dir("B").unwrap());
        assert_eq!(feed.package_dir("B"), temp.path().join("B"));
    }

    #[test]
    fn test_root_blocked_by_file() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("feed");
        fs::write(&blocker, b"not a directory").unwrap();

        let feed = LocalFeed::new(&blocker);
        let err = feed.ensure_root().unwrap_err();
        assert!(matches!(err, PublishError::CreateDirectoryFailed { .. }));
    }
}
