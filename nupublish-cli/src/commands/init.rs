//! Init command - create the configuration file.

use nupublish::config::ConfigFile;
use nupublish::publisher::{default_feed_root, DEFAULT_OUTPUT_DIR, DEFAULT_TEMPLATE_DIR};

use super::common::LoadedConfig;
use crate::error::CliError;

/// Run the init command.
///
/// An existing file is left untouched.
pub fn run(loaded: &LoadedConfig) -> Result<(), CliError> {
    if loaded.path.exists() {
        println!("Configuration file already exists: {}", loaded.path.display());
        println!("Use 'nupublish config list' to view the current settings.");
        return Ok(());
    }

    ConfigFile::default().save_to(&loaded.path)?;

    println!("Configuration file: {}", loaded.path.display());
    println!();
    println!("Defaults:");
    println!("  templates   ./{}/_<package>.nuspec.base", DEFAULT_TEMPLATE_DIR);
    println!("  packages    ./{}/", DEFAULT_OUTPUT_DIR);
    println!("  local feed  {}", default_feed_root().display());
    println!();
    println!("Edit this file to customize NuPublish settings.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}
