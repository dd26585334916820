//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, and `config path` commands
//! for viewing and modifying configuration settings from the command line.

use clap::Subcommand;
use nupublish::config::{ConfigFile, ConfigKey};

use super::common::LoadedConfig;
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., paths.feed_root)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., paths.feed_root)
        key: String,

        /// Value to set (empty to unset an optional path)
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, loaded: &LoadedConfig) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(&key, &loaded.config),
        ConfigCommands::Set { key, value } => run_set(&key, &value, loaded),
        ConfigCommands::List => run_list(&loaded.config),
        ConfigCommands::Path => {
            println!("{}", loaded.path.display());
            Ok(())
        }
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'nupublish config list' to see available keys.",
            key
        ))
    })
}

/// Get a configuration value.
fn run_get(key: &str, config: &ConfigFile) -> Result<(), CliError> {
    let value = parse_key(key)?.get(config);

    if value.is_empty() {
        println!("(not set)");
    } else {
        println!("{}", value);
    }

    Ok(())
}

/// Set a configuration value and save the file.
fn run_set(key: &str, value: &str, loaded: &LoadedConfig) -> Result<(), CliError> {
    let config_key = parse_key(key)?;

    let mut config = loaded.config.clone();
    config_key
        .set(&mut config, value)
        .map_err(|e| CliError::Config(e.to_string()))?;
    config.save_to(&loaded.path)?;

    println!("Set {} = {}", config_key.name(), config_key.get(&config));

    Ok(())
}

/// List all configuration settings.
fn run_list(config: &ConfigFile) -> Result<(), CliError> {
    println!("Configuration Settings");
    println!("======================");
    println!();

    let mut current_section = "";

    for key in ConfigKey::all() {
        let section = key.section();

        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", section);
            current_section = section;
        }

        let value = key.get(config);
        if value.is_empty() {
            println!("  {} = (not set)", key.key_name());
        } else {
            println!("  {} = {}", key.key_name(), value);
        }
    }

    Ok(())
}
