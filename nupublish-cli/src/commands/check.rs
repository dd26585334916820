//! Check command - verify the packaging tool can be launched.

use nupublish::config::ConfigFile;
use nupublish::publisher::NugetRunner;

use super::common::{resolve_layout, LayoutOverrides};
use super::publish::Output;
use crate::error::CliError;

/// Run the check command.
pub fn run(config: &ConfigFile, out: &dyn Output) -> Result<(), CliError> {
    let layout = resolve_layout(config, &LayoutOverrides::default())?;
    let runner = NugetRunner::new(config.nuget.executable.clone(), &layout.working_dir);

    let banner = runner.check_available()?;
    out.success(&format!("{} is available", config.nuget.executable));
    if !banner.is_empty() {
        out.indented(&banner);
    }

    out.newline();
    out.println(&format!("Template dir: {}", layout.template_dir.display()));
    out.println(&format!("Output dir:   {}", layout.output_dir.display()));
    out.println(&format!("Local feed:   {}", layout.feed_root.display()));
    out.println(&format!("Remote:       {}", layout.remote_source));
    Ok(())
}
