//! Resolved filesystem layout and naming for a publish run.
//!
//! This module is the single source of truth for every path the publisher
//! touches:
//! - Template: `{template_dir}/_{package}.{ext}.base`
//! - Working manifest: `{working_dir}/{package}.{version}.{ext}`
//! - History copy: `{history_dir}/{package}.{version}.{ext}`
//! - Package artifact: `{output_dir}/{package}.{version}.nupkg`
//! - Source config: `{template_dir}/_{package}.nuget.config`
//! - Local feed: `{feed_root}/{package}`
//!
//! All directories are absolute once the layout is built.

use std::path::{Path, PathBuf};

/// Default directory (under the working directory) holding templates.
pub const DEFAULT_TEMPLATE_DIR: &str = "NupkgConfig";

/// Default directory (under the working directory) receiving packed artifacts.
pub const DEFAULT_OUTPUT_DIR: &str = "NupkgOutput";

/// Default manifest file extension.
pub const DEFAULT_MANIFEST_EXTENSION: &str = "nuspec";

/// Default name of the remote package source.
pub const DEFAULT_REMOTE_SOURCE: &str = "github";

/// Extension of packed artifacts.
pub const PACKAGE_EXTENSION: &str = "nupkg";

/// Default local feed root: `<data dir>/nupublish/feed`.
pub fn default_feed_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("nupublish")
        .join("feed")
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_path(base: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Absolute paths and names used by one publish run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishLayout {
    /// Directory the working manifest is written to and external commands run in.
    pub working_dir: PathBuf,

    /// Directory holding `_<package>` templates and source configs.
    pub template_dir: PathBuf,

    /// Directory keeping a manifest copy of every published version.
    pub history_dir: PathBuf,

    /// Directory the pack command writes artifacts to.
    pub output_dir: PathBuf,

    /// Root of the local package feed.
    pub feed_root: PathBuf,

    /// Name of the remote source passed to push.
    pub remote_source: String,

    /// Manifest file extension without the dot.
    pub manifest_extension: String,
}

impl PublishLayout {
    /// Create the default layout rooted at `working_dir`.
    ///
    /// A relative `working_dir` is resolved against the current directory.
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        let working_dir = match std::env::current_dir() {
            Ok(cwd) => resolve_path(&cwd, working_dir),
            Err(_) => working_dir.as_ref().to_path_buf(),
        };
        let template_dir = working_dir.join(DEFAULT_TEMPLATE_DIR);
        Self {
            history_dir: template_dir.clone(),
            output_dir: working_dir.join(DEFAULT_OUTPUT_DIR),
            template_dir,
            feed_root: default_feed_root(),
            remote_source: DEFAULT_REMOTE_SOURCE.to_string(),
            manifest_extension: DEFAULT_MANIFEST_EXTENSION.to_string(),
            working_dir,
        }
    }

    /// Set the template directory. History follows it unless set afterwards.
    pub fn with_template_dir(mut self, path: impl AsRef<Path>) -> Self {
        let resolved = resolve_path(&self.working_dir, path);
        if self.history_dir == self.template_dir {
            self.history_dir = resolved.clone();
        }
        self.template_dir = resolved;
        self
    }

    /// Set the history directory.
    pub fn with_history_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.history_dir = resolve_path(&self.working_dir, path);
        self
    }

    /// Set the artifact output directory.
    pub fn with_output_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.output_dir = resolve_path(&self.working_dir, path);
        self
    }

    /// Set the local feed root.
    pub fn with_feed_root(mut self, path: impl AsRef<Path>) -> Self {
        self.feed_root = resolve_path(&self.working_dir, path);
        self
    }

    /// Set the remote source name.
    pub fn with_remote_source(mut self, source: impl Into<String>) -> Self {
        self.remote_source = source.into();
        self
    }

    /// Set the manifest extension (a leading dot is ignored).
    pub fn with_manifest_extension(mut self, extension: &str) -> Self {
        self.manifest_extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Filename of a rendered manifest: `{package}.{version}.{ext}`.
    pub fn manifest_filename(&self, package: &str, version: &str) -> String {
        format!("{}.{}.{}", package, version, self.manifest_extension)
    }

    /// Path of the package's template.
    pub fn template_path(&self, package: &str) -> PathBuf {
        self.template_dir
            .join(format!("_{}.{}.base", package, self.manifest_extension))
    }

    /// Path of the transient working manifest.
    pub fn output_manifest_path(&self, package: &str, version: &str) -> PathBuf {
        self.working_dir.join(self.manifest_filename(package, version))
    }

    /// Path of the persistent history copy.
    pub fn history_manifest_path(&self, package: &str, version: &str) -> PathBuf {
        self.history_dir.join(self.manifest_filename(package, version))
    }

    /// Path of the artifact produced by the pack command.
    pub fn artifact_path(&self, package: &str, version: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}.{}", package, version, PACKAGE_EXTENSION))
    }

    /// Path of the source/credential config passed to push.
    pub fn source_config_path(&self, package: &str) -> PathBuf {
        self.template_dir.join(format!("_{}.nuget.config", package))
    }

    /// Directory of the package inside the local feed.
    pub fn feed_package_dir(&self, package: &str) -> PathBuf {
        self.feed_root.join(package)
    }
}
