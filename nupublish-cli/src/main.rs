//! NuPublish CLI - Command-line interface
//!
//! Renders a package's manifest template, packs it with the NuGet tool and
//! publishes the package to a local feed, a remote source, or both.

mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use nupublish::logging::{init_logging, LoggingConfig};
use tracing::debug;

use commands::common::{load_config, LoadedConfig};
use commands::config::ConfigCommands;
use commands::publish::{ConsoleOutput, Output, PublishArgs};
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "nupublish")]
#[command(version, about = "Render NuGet manifests from templates and publish packages")]
#[command(args_conflicts_with_subcommands = true)]
#[command(after_help = "Example: nupublish SharpWrap 1.2.0 j2534 BOTH \"Timeout fixes -- Retry on busy\"")]
struct Cli {
    /// Configuration file (default: <config dir>/nupublish/config.ini)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    publish: PublishArgs,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create a default configuration file
    Init,

    /// View or modify configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// List published versions of a package
    History {
        /// Package name
        package: String,
    },

    /// Verify the packaging tool can be launched
    Check,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        ConsoleOutput.error(&e.to_string());
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let loaded = load_config(cli.config.as_deref())?;

    let _guard = init_logging(&LoggingConfig {
        level: loaded.config.logging.level.clone(),
        directory: loaded.config.logging.directory.clone(),
        verbose: cli.verbose,
    })?;
    debug!(config = %loaded.path.display(), "Loaded configuration");

    dispatch(cli.command, &cli.publish, &loaded, &ConsoleOutput)
}

fn dispatch(
    command: Option<Commands>,
    publish: &PublishArgs,
    loaded: &LoadedConfig,
    out: &dyn Output,
) -> Result<(), CliError> {
    match command {
        None => commands::publish::run(publish, &loaded.config, out),
        Some(Commands::Init) => commands::init::run(loaded),
        Some(Commands::Config { command }) => commands::config::run(command, loaded),
        Some(Commands::History { package }) => {
            commands::history::run(&package, &loaded.config, out)
        }
        Some(Commands::Check) => commands::check::run(&loaded.config, out),
    }
}
