//! Publish command: render, pack and publish one package version.

mod output;
mod traits;

use std::path::PathBuf;

use clap::Args;
use nupublish::config::ConfigFile;
use nupublish::publisher::{NugetRunner, PublishRequest, Publisher};
use tracing::debug;

use super::common::{resolve_layout, resolve_policy, resolve_settle_delay, LayoutOverrides};
use crate::error::CliError;

pub use output::{print_history, print_report, print_request_error};
pub use traits::{ConsoleOutput, Output};

/// Arguments of the default (publish) command.
#[derive(Debug, Clone, Default, Args)]
pub struct PublishArgs {
    /// Package name; the template is <template dir>/_<name>.nuspec.base
    pub package: Option<String>,

    /// Package version, e.g. 1.4.2
    #[arg(value_name = "VERSION")]
    pub pkg_version: Option<String>,

    /// Tag string written to the manifest
    pub tags: Option<String>,

    /// Where to publish: LOCAL, REMOTE or BOTH
    pub destination: Option<String>,

    /// Release notes. Use '-- <entry>' to split notes into bullet points
    #[arg(allow_hyphen_values = true)]
    pub notes: Option<String>,

    /// Keep going when a packaging command fails
    #[arg(long)]
    pub best_effort: bool,

    /// Delay before each publish step and cleanup, in milliseconds
    #[arg(long, value_name = "MS")]
    pub settle_delay_ms: Option<u64>,

    /// Local feed root directory
    #[arg(long, value_name = "DIR")]
    pub feed_root: Option<PathBuf>,

    /// Remote package source name
    #[arg(long, value_name = "NAME")]
    pub source: Option<String>,
}

impl PublishArgs {
    /// Positional arguments given, in order, stopping at the first missing one.
    pub fn positionals(&self) -> Vec<&str> {
        [
            &self.package,
            &self.pkg_version,
            &self.tags,
            &self.destination,
            &self.notes,
        ]
        .into_iter()
        .map_while(|arg| arg.as_deref())
        .collect()
    }
}

/// Run the publish command.
///
/// Invalid requests print the usage hint and return `Ok`; only pipeline
/// failures are errors.
pub fn run(args: &PublishArgs, config: &ConfigFile, out: &dyn Output) -> Result<(), CliError> {
    let request = match PublishRequest::from_args(args.positionals()) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "Rejected publish request");
            print_request_error(out, &e);
            return Ok(());
        }
    };

    let overrides = LayoutOverrides {
        feed_root: args.feed_root.clone(),
        source: args.source.clone(),
    };
    let layout = resolve_layout(config, &overrides)?;
    let runner = NugetRunner::new(config.nuget.executable.clone(), &layout.working_dir);

    let publisher = Publisher::new(layout, runner)
        .with_settle_delay(resolve_settle_delay(args.settle_delay_ms, config))
        .with_failure_policy(resolve_policy(args.best_effort, config));

    let report = publisher.publish(&request)?;
    print_report(out, &report);
    Ok(())
}
