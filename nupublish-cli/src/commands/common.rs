//! Common utilities shared across CLI commands.

use std::path::{Path, PathBuf};
use std::time::Duration;

use nupublish::config::{config_file_path, ConfigFile};
use nupublish::publisher::{FailurePolicy, PublishLayout};

use crate::error::CliError;

/// Configuration loaded once at start-up, with the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ConfigFile,
    pub path: PathBuf,
}

/// Load the config file given with `--config`, or the default one.
pub fn load_config(cli_path: Option<&Path>) -> Result<LoadedConfig, CliError> {
    let path = cli_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path);
    let config = ConfigFile::load_from(&path)?;
    Ok(LoadedConfig { config, path })
}

/// Layout settings that can be overridden on the command line.
#[derive(Debug, Clone, Default)]
pub struct LayoutOverrides {
    pub feed_root: Option<PathBuf>,
    pub source: Option<String>,
}

/// Resolve the layout from the current directory, config and CLI overrides.
pub fn resolve_layout(
    config: &ConfigFile,
    overrides: &LayoutOverrides,
) -> Result<PublishLayout, CliError> {
    let cwd = std::env::current_dir().map_err(CliError::CurrentDir)?;
    Ok(apply_overrides(config.layout(&cwd), overrides))
}

fn apply_overrides(mut layout: PublishLayout, overrides: &LayoutOverrides) -> PublishLayout {
    // CLI takes precedence over config
    if let Some(feed_root) = &overrides.feed_root {
        layout = layout.with_feed_root(feed_root);
    }
    if let Some(source) = &overrides.source {
        layout = layout.with_remote_source(source.clone());
    }
    layout
}

/// Resolve the failure policy: `--best-effort` wins over the config value.
pub fn resolve_policy(cli_best_effort: bool, config: &ConfigFile) -> FailurePolicy {
    if cli_best_effort {
        FailurePolicy::BestEffort
    } else {
        config.publish.on_command_failure
    }
}

/// Resolve the settle delay from CLI args and config.
pub fn resolve_settle_delay(cli_delay_ms: Option<u64>, config: &ConfigFile) -> Duration {
    cli_delay_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.settle_delay())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_from_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.ini");
        fs::write(&path, "[nuget]\nremote_source = internal\n").unwrap();

        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded.path, path);
        assert_eq!(loaded.config.nuget.remote_source, "internal");
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut config = ConfigFile::default();
        config.paths.feed_root = Some(PathBuf::from("/srv/config-feed"));

        let overrides = LayoutOverrides {
            feed_root: Some(PathBuf::from("/srv/cli-feed")),
            source: Some("nuget.org".to_string()),
        };
        let layout = apply_overrides(config.layout(Path::new("/work")), &overrides);

        assert_eq!(layout.feed_root, PathBuf::from("/srv/cli-feed"));
        assert_eq!(layout.remote_source, "nuget.org");
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = ConfigFile::default();
        config.paths.feed_root = Some(PathBuf::from("/srv/config-feed"));

        let layout = apply_overrides(config.layout(Path::new("/work")), &LayoutOverrides::default());
        assert_eq!(layout.feed_root, PathBuf::from("/srv/config-feed"));
        assert_eq!(layout.remote_source, "github");
    }

    #[test]
    fn test_resolve_policy_and_delay() {
        let mut config = ConfigFile::default();
        assert_eq!(resolve_policy(false, &config), FailurePolicy::Strict);
        assert_eq!(resolve_policy(true, &config), FailurePolicy::BestEffort);

        config.publish.settle_delay_ms = 200;
        assert_eq!(resolve_settle_delay(None, &config), Duration::from_millis(200));
        assert_eq!(resolve_settle_delay(Some(0), &config), Duration::ZERO);
    }
}
