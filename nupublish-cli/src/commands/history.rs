//! History command - list published versions of a package.

use nupublish::config::ConfigFile;
use nupublish::publisher::list_history;

use super::common::{resolve_layout, LayoutOverrides};
use super::publish::{print_history, Output};
use crate::error::CliError;

/// Run the history command.
pub fn run(package: &str, config: &ConfigFile, out: &dyn Output) -> Result<(), CliError> {
    let layout = resolve_layout(config, &LayoutOverrides::default())?;
    let entries = list_history(&layout.history_dir, package, &layout.manifest_extension)?;
    print_history(out, package, &entries);
    Ok(())
}
