//! External packaging-tool commands.
//!
//! The publisher never builds shell strings. Each operation is described by a
//! [`ToolCommand`] and executed by a [`CommandRunner`]; [`NugetRunner`] runs
//! the real `nuget` executable synchronously and captures its exit status and
//! output. Tests substitute a recording runner.
//!
//! Commands have no timeout: a hung packaging tool hangs the publish run.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::{PublishError, PublishResult};

/// Flag that makes push a no-op for versions already on the source.
pub const SKIP_DUPLICATE_FLAG: &str = "-SkipDuplicate";

/// Default packaging tool executable.
pub const DEFAULT_EXECUTABLE: &str = "nuget";

/// One invocation of the packaging tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCommand {
    /// Build a package from a manifest.
    Pack {
        manifest: PathBuf,
        output_dir: PathBuf,
    },

    /// Publish a package to a remote source.
    Push {
        package: PathBuf,
        source: String,
        config_file: PathBuf,
        skip_duplicate: bool,
    },

    /// Initialize a local feed from the packages in a directory.
    InitFeed { source_dir: PathBuf, feed_root: PathBuf },

    /// Add a package to a local feed.
    AddToFeed { package: PathBuf, feed_root: PathBuf },
}

impl ToolCommand {
    /// Tool verb for this command.
    pub fn verb(&self) -> &'static str {
        match self {
            ToolCommand::Pack { .. } => "pack",
            ToolCommand::Push { .. } => "push",
            ToolCommand::InitFeed { .. } => "init",
            ToolCommand::AddToFeed { .. } => "add",
        }
    }

    /// Arguments passed to the tool executable.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![self.verb().into()];
        match self {
            ToolCommand::Pack {
                manifest,
                output_dir,
            } => {
                args.push(manifest.into());
                args.push("-OutputDirectory".into());
                args.push(output_dir.into());
            }
            ToolCommand::Push {
                package,
                source,
                config_file,
                skip_duplicate,
            } => {
                args.push(package.into());
                args.push("-Source".into());
                args.push(source.into());
                args.push("-ConfigFile".into());
                args.push(config_file.into());
                if *skip_duplicate {
                    args.push(SKIP_DUPLICATE_FLAG.into());
                }
            }
            ToolCommand::InitFeed {
                source_dir,
                feed_root,
            } => {
                args.push(source_dir.into());
                args.push(feed_root.into());
            }
            ToolCommand::AddToFeed { package, feed_root } => {
                args.push(package.into());
                args.push("-Source".into());
                args.push(feed_root.into());
            }
        }
        args
    }

    /// Human-readable command line for logs and error messages.
    pub fn command_line(&self, program: &str) -> String {
        let mut line = program.to_string();
        for arg in self.args() {
            line.push(' ');
            let arg = arg.to_string_lossy();
            if arg.contains(char::is_whitespace) {
                line.push('"');
                line.push_str(&arg);
                line.push('"');
            } else {
                line.push_str(&arg);
            }
        }
        line
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal.
    pub exit_code: Option<i32>,

    /// Whether the command reported success.
    pub success: bool,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,
}

impl CommandOutput {
    /// A successful output with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed output with the given exit code and stderr.
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Executes packaging-tool commands.
pub trait CommandRunner {
    /// Program name shown in command lines.
    fn program(&self) -> &str;

    /// Run a command to completion.
    ///
    /// # Errors
    ///
    /// Returns an I/O error only when the process could not be started.
    /// A started process that fails is reported through
    /// [`CommandOutput::success`].
    fn run(&self, command: &ToolCommand) -> io::Result<CommandOutput>;
}

/// Runs the real packaging tool executable.
#[derive(Debug, Clone)]
pub struct NugetRunner {
    executable: String,
    working_dir: PathBuf,
}

impl NugetRunner {
    /// Create a runner for `executable`, running commands in `working_dir`.
    pub fn new(executable: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            working_dir: working_dir.into(),
        }
    }

    /// Directory commands run in.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Check that the executable can be launched.
    ///
    /// Runs `<executable> help` and returns the first line of its output
    /// (the tool's version banner).
    pub fn check_available(&self) -> PublishResult<String> {
        let result = Command::new(&self.executable).arg("help").output();

        match result {
            Ok(output) if output.status.success() => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
            }
            Ok(output) => Err(PublishError::ToolUnavailable(format!(
                "'{}' exited with {}. Please ensure it is properly installed.",
                self.executable, output.status
            ))),
            Err(e) => Err(PublishError::ToolUnavailable(format!(
                "'{}' command not found: {}. \
                 Install the NuGet CLI or set nuget.executable in config.ini.",
                self.executable, e
            ))),
        }
    }
}

impl CommandRunner for NugetRunner {
    fn program(&self) -> &str {
        &self.executable
    }

    fn run(&self, command: &ToolCommand) -> io::Result<CommandOutput> {
        let output = Command::new(&self.executable)
            .current_dir(&self.working_dir)
            .args(command.args())
            .output()?;

        let captured = CommandOutput {
            exit_code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        debug!(
            verb = command.verb(),
            exit_code = ?captured.exit_code,
            stdout = %captured.stdout.trim(),
            stderr = %captured.stderr.trim(),
            "Command finished"
        );

        Ok(captured)
    }
}
