//! Addressable configuration keys (`section.key`).

use std::path::PathBuf;
use std::str::FromStr;

use super::{ConfigError, ConfigFile};
use crate::publisher::FailurePolicy;

/// Log levels accepted by `logging.level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Every key that can be read or written through `config get/set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    PathsWorkingDir,
    PathsTemplateDir,
    PathsHistoryDir,
    PathsOutputDir,
    PathsFeedRoot,
    NugetExecutable,
    NugetRemoteSource,
    NugetManifestExtension,
    PublishSettleDelayMs,
    PublishOnCommandFailure,
    LoggingLevel,
    LoggingDirectory,
}

const ALL_KEYS: [ConfigKey; 12] = [
    ConfigKey::PathsWorkingDir,
    ConfigKey::PathsTemplateDir,
    ConfigKey::PathsHistoryDir,
    ConfigKey::PathsOutputDir,
    ConfigKey::PathsFeedRoot,
    ConfigKey::NugetExecutable,
    ConfigKey::NugetRemoteSource,
    ConfigKey::NugetManifestExtension,
    ConfigKey::PublishSettleDelayMs,
    ConfigKey::PublishOnCommandFailure,
    ConfigKey::LoggingLevel,
    ConfigKey::LoggingDirectory,
];

impl ConfigKey {
    /// All keys in file order.
    pub fn all() -> &'static [ConfigKey] {
        &ALL_KEYS
    }

    /// INI section name.
    pub fn section(self) -> &'static str {
        match self {
            ConfigKey::PathsWorkingDir
            | ConfigKey::PathsTemplateDir
            | ConfigKey::PathsHistoryDir
            | ConfigKey::PathsOutputDir
            | ConfigKey::PathsFeedRoot => "paths",
            ConfigKey::NugetExecutable
            | ConfigKey::NugetRemoteSource
            | ConfigKey::NugetManifestExtension => "nuget",
            ConfigKey::PublishSettleDelayMs | ConfigKey::PublishOnCommandFailure => "publish",
            ConfigKey::LoggingLevel | ConfigKey::LoggingDirectory => "logging",
        }
    }

    /// Key name within its section.
    pub fn key_name(self) -> &'static str {
        match self {
            ConfigKey::PathsWorkingDir => "working_dir",
            ConfigKey::PathsTemplateDir => "template_dir",
            ConfigKey::PathsHistoryDir => "history_dir",
            ConfigKey::PathsOutputDir => "output_dir",
            ConfigKey::PathsFeedRoot => "feed_root",
            ConfigKey::NugetExecutable => "executable",
            ConfigKey::NugetRemoteSource => "remote_source",
            ConfigKey::NugetManifestExtension => "manifest_extension",
            ConfigKey::PublishSettleDelayMs => "settle_delay_ms",
            ConfigKey::PublishOnCommandFailure => "on_command_failure",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingDirectory => "directory",
        }
    }

    /// Full `section.key` name.
    pub fn name(self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as a string; empty when an optional value is unset.
    pub fn get(self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::PathsWorkingDir => path_string(&config.paths.working_dir),
            ConfigKey::PathsTemplateDir => path_string(&config.paths.template_dir),
            ConfigKey::PathsHistoryDir => path_string(&config.paths.history_dir),
            ConfigKey::PathsOutputDir => path_string(&config.paths.output_dir),
            ConfigKey::PathsFeedRoot => path_string(&config.paths.feed_root),
            ConfigKey::NugetExecutable => config.nuget.executable.clone(),
            ConfigKey::NugetRemoteSource => config.nuget.remote_source.clone(),
            ConfigKey::NugetManifestExtension => config.nuget.manifest_extension.clone(),
            ConfigKey::PublishSettleDelayMs => config.publish.settle_delay_ms.to_string(),
            ConfigKey::PublishOnCommandFailure => {
                config.publish.on_command_failure.as_str().to_string()
            }
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingDirectory => path_string(&config.logging.directory),
        }
    }

    /// Parse and store a value.
    ///
    /// An empty value clears optional path settings.
    pub fn set(self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match self {
            ConfigKey::PathsWorkingDir => config.paths.working_dir = optional_path(value),
            ConfigKey::PathsTemplateDir => config.paths.template_dir = optional_path(value),
            ConfigKey::PathsHistoryDir => config.paths.history_dir = optional_path(value),
            ConfigKey::PathsOutputDir => config.paths.output_dir = optional_path(value),
            ConfigKey::PathsFeedRoot => config.paths.feed_root = optional_path(value),
            ConfigKey::NugetExecutable => {
                config.nuget.executable = self.required(value)?.to_string()
            }
            ConfigKey::NugetRemoteSource => {
                config.nuget.remote_source = self.required(value)?.to_string()
            }
            ConfigKey::NugetManifestExtension => {
                config.nuget.manifest_extension =
                    self.required(value)?.trim_start_matches('.').to_string()
            }
            ConfigKey::PublishSettleDelayMs => {
                config.publish.settle_delay_ms =
                    value.parse().map_err(|_| self.invalid(value, "expected milliseconds"))?
            }
            ConfigKey::PublishOnCommandFailure => {
                config.publish.on_command_failure = value
                    .parse::<FailurePolicy>()
                    .map_err(|reason| self.invalid(value, &reason))?
            }
            ConfigKey::LoggingLevel => {
                let level = value.to_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(self.invalid(value, "expected trace, debug, info, warn or error"));
                }
                config.logging.level = level;
            }
            ConfigKey::LoggingDirectory => config.logging.directory = optional_path(value),
        }
        Ok(())
    }

    fn required<'a>(self, value: &'a str) -> Result<&'a str, ConfigError> {
        if value.is_empty() {
            Err(self.invalid(value, "value cannot be empty"))
        } else {
            Ok(value)
        }
    }

    fn invalid(self, value: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

fn path_string(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn optional_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}
