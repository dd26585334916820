//! Configuration file support.
//!
//! Settings live in an INI file at `<config dir>/nupublish/config.ini`
//! (`~/.config/nupublish/config.ini` on Linux). A missing file means defaults;
//! command-line options override file values.
//!
//! ```ini
//! [paths]
//! working_dir =
//! template_dir =
//! history_dir =
//! output_dir =
//! feed_root = /srv/nuget
//!
//! [nuget]
//! executable = nuget
//! remote_source = github
//! manifest_extension = nuspec
//!
//! [publish]
//! settle_delay_ms = 1500
//! on_command_failure = strict
//!
//! [logging]
//! level = info
//! directory =
//! ```

mod keys;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::{EscapePolicy, Ini};
use thiserror::Error;

use crate::publisher::{
    resolve_path, FailurePolicy, PublishLayout, DEFAULT_EXECUTABLE, DEFAULT_MANIFEST_EXTENSION,
    DEFAULT_REMOTE_SOURCE, DEFAULT_SETTLE_DELAY,
};

pub use keys::{ConfigKey, LOG_LEVELS};

/// Config file name within the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Errors reading, writing or editing the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },

    #[error("failed to write config {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Path of the default config file.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nupublish")
        .join(CONFIG_FILE_NAME)
}

/// `[paths]` section. Relative paths resolve against the working directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathsSettings {
    pub working_dir: Option<PathBuf>,
    pub template_dir: Option<PathBuf>,
    pub history_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub feed_root: Option<PathBuf>,
}

/// `[nuget]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NugetSettings {
    pub executable: String,
    pub remote_source: String,
    pub manifest_extension: String,
}

impl Default for NugetSettings {
    fn default() -> Self {
        Self {
            executable: DEFAULT_EXECUTABLE.to_string(),
            remote_source: DEFAULT_REMOTE_SOURCE.to_string(),
            manifest_extension: DEFAULT_MANIFEST_EXTENSION.to_string(),
        }
    }
}

/// `[publish]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSettings {
    pub settle_delay_ms: u64,
    pub on_command_failure: FailurePolicy,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            settle_delay_ms: DEFAULT_SETTLE_DELAY.as_millis() as u64,
            on_command_failure: FailurePolicy::default(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: String,
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub paths: PathsSettings,
    pub nuget: NugetSettings,
    pub publish: PublishSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load from the default path, falling back to defaults if it is missing.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(config_file_path())
    }

    /// Load from `path`, falling back to defaults if it is missing.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file_noescape(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    /// Build from parsed INI data. Unknown sections and keys are ignored.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for key in ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                key.set(&mut config, value)?;
            }
        }
        Ok(config)
    }

    /// Convert to INI data, including unset optional keys as empty values.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini
    }

    /// Save to the default path.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(config_file_path())
    }

    /// Save to `path`, creating its directory if needed.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        self.to_ini()
            .write_to_file_policy(path, EscapePolicy::Nothing)
            .map_err(|e| ConfigError::Write {
                path: path.to_path_buf(),
                source: e,
            })
    }

    /// Settle delay as a duration.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.publish.settle_delay_ms)
    }

    /// Resolve all configured paths into an absolute layout.
    ///
    /// `cwd` is used as the working directory unless `paths.working_dir` is
    /// set; relative configured paths resolve against the working directory.
    pub fn layout(&self, cwd: &Path) -> PublishLayout {
        let working_dir = match &self.paths.working_dir {
            Some(dir) => resolve_path(cwd, dir),
            None => cwd.to_path_buf(),
        };

        let mut layout = PublishLayout::new(&working_dir)
            .with_remote_source(self.nuget.remote_source.clone())
            .with_manifest_extension(&self.nuget.manifest_extension);

        if let Some(dir) = &self.paths.template_dir {
            layout = layout.with_template_dir(dir);
        }
        if let Some(dir) = &self.paths.history_dir {
            layout = layout.with_history_dir(dir);
        }
        if let Some(dir) = &self.paths.output_dir {
            layout = layout.with_output_dir(dir);
        }
        if let Some(dir) = &self.paths.feed_root {
            layout = layout.with_feed_root(dir);
        }
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ConfigFile::default();
        assert_eq!(config.nuget.executable, "nuget");
        assert_eq!(config.nuget.remote_source, "github");
        assert_eq!(config.publish.settle_delay_ms, 1500);
        assert_eq!(config.publish.on_command_failure, FailurePolicy::Strict);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ConfigFile::load_from(temp.path().join("config.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_load_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        fs::write(
            &path,
            "[paths]\nfeed_root = /srv/nuget\n\n[publish]\non_command_failure = best-effort\n\n[extra]\nignored = yes\n",
        )
        .unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.paths.feed_root, Some(PathBuf::from("/srv/nuget")));
        assert_eq!(config.publish.on_command_failure, FailurePolicy::BestEffort);
        assert_eq!(config.nuget, NugetSettings::default());
    }

    #[test]
    fn test_load_invalid_value() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        fs::write(&path, "[publish]\nsettle_delay_ms = later\n").unwrap();

        let err = ConfigFile::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("publish.settle_delay_ms"));
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.paths.template_dir = Some(PathBuf::from("templates"));
        config.publish.settle_delay_ms = 0;
        config.save_to(&path).unwrap();

        assert_eq!(ConfigFile::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_layout_resolution() {
        let mut config = ConfigFile::default();
        config.paths.working_dir = Some(PathBuf::from("pkg"));
        config.paths.output_dir = Some(PathBuf::from("dist"));
        config.paths.feed_root = Some(PathBuf::from("/srv/feed"));
        config.nuget.remote_source = "internal".to_string();

        let layout = config.layout(Path::new("/home/dev"));
        assert_eq!(layout.working_dir, PathBuf::from("/home/dev/pkg"));
        assert_eq!(layout.template_dir, PathBuf::from("/home/dev/pkg/NupkgConfig"));
        assert_eq!(layout.output_dir, PathBuf::from("/home/dev/pkg/dist"));
        assert_eq!(layout.feed_root, PathBuf::from("/srv/feed"));
        assert_eq!(layout.remote_source, "internal");
    }

    #[test]
    fn test_config_file_path_name() {
        let path = config_file_path();
        assert!(path.ends_with("nupublish/config.ini"));
    }
}
