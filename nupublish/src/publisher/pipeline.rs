//! The publish pipeline.
//!
//! ```text
//! Render ─► WriteArtifacts ─► Pack ─┬─► LocalFeed ──┬─► Cleanup
//!                                   └─► RemotePush ─┘
//! ```
//!
//! Stages run strictly in order. Local and remote publishing are selected by
//! the request's [`Destination`](super::Destination); with `BOTH` the local
//! feed goes first. A settle delay precedes each publish stage and the final
//! cleanup, giving the packaging tool and feed indexes time to observe the
//! freshly written package.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::feed::LocalFeed;
use super::layout::PublishLayout;
use super::request::{Destination, PublishRequest};
use super::runner::{CommandRunner, ToolCommand};
use super::{CommandFailure, PublishError, PublishResult};
use crate::manifest::ManifestTemplate;

/// Default settle delay between artifact production and publishing.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1500);

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Render,
    WriteArtifacts,
    Pack,
    LocalFeed,
    RemotePush,
    Cleanup,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Render => "render",
            Stage::WriteArtifacts => "write artifacts",
            Stage::Pack => "pack",
            Stage::LocalFeed => "local feed",
            Stage::RemotePush => "remote push",
            Stage::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

/// What to do when an external command fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort the run with an error at the first failure.
    #[default]
    Strict,
    /// Log the failure, record it in the report and continue.
    BestEffort,
}

impl FailurePolicy {
    /// Config file spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            FailurePolicy::Strict => "strict",
            FailurePolicy::BestEffort => "best-effort",
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(FailurePolicy::Strict),
            "best-effort" | "best_effort" | "besteffort" => Ok(FailurePolicy::BestEffort),
            other => Err(format!(
                "unknown failure policy '{}': expected strict or best-effort",
                other
            )),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a publish run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub package: String,
    pub version: String,
    pub destination: Destination,

    /// Working manifest (removed during cleanup).
    pub output_manifest: PathBuf,

    /// Persistent history copy.
    pub history_manifest: PathBuf,

    /// Package produced by the pack command.
    pub artifact: PathBuf,

    /// Whether the local feed was initialized for this package during the run.
    pub feed_initialized: bool,

    /// Stages that completed without a command failure.
    pub completed: Vec<Stage>,

    /// Command failures tolerated under [`FailurePolicy::BestEffort`].
    pub failures: Vec<CommandFailure>,
}

impl PublishReport {
    /// True when every stage completed without a command failure.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Renders, packs and publishes packages.
pub struct Publisher<R> {
    layout: PublishLayout,
    runner: R,
    settle_delay: Duration,
    policy: FailurePolicy,
}

impl<R: CommandRunner> Publisher<R> {
    /// Create a publisher with the default settle delay and strict failures.
    pub fn new(layout: PublishLayout, runner: R) -> Self {
        Self {
            layout,
            runner,
            settle_delay: DEFAULT_SETTLE_DELAY,
            policy: FailurePolicy::default(),
        }
    }

    /// Set the settle delay.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set the failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The layout in use.
    pub fn layout(&self) -> &PublishLayout {
        &self.layout
    }

    /// The command runner in use.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run the full pipeline for one request.
    ///
    /// # Errors
    ///
    /// Template, render and filesystem errors always abort the run. External
    /// command failures abort it under [`FailurePolicy::Strict`]; under
    /// [`FailurePolicy::BestEffort`] they are collected in the report. The
    /// working manifest is left in place when the run aborts.
    pub fn publish(&self, request: &PublishRequest) -> PublishResult<PublishReport> {
        let package = request.package();
        let version = request.version();

        info!(
            package,
            version,
            destination = %request.destination(),
            policy = %self.policy,
            "Publishing package"
        );

        let mut report = PublishReport {
            package: package.to_string(),
            version: version.to_string(),
            destination: request.destination(),
            output_manifest: self.layout.output_manifest_path(package, version),
            history_manifest: self.layout.history_manifest_path(package, version),
            artifact: self.layout.artifact_path(package, version),
            feed_initialized: false,
            completed: Vec::new(),
            failures: Vec::new(),
        };

        // Render
        let template_path = self.layout.template_path(package);
        let template = ManifestTemplate::load(&template_path)?;
        let rendered = template.render(&request.manifest_fields())?;
        report.completed.push(Stage::Render);

        // Write artifacts
        replace_file(&report.output_manifest, &rendered)?;
        replace_file(&report.history_manifest, &rendered)?;
        info!(
            manifest = %report.output_manifest.display(),
            history = %report.history_manifest.display(),
            "Wrote rendered manifest"
        );
        report.completed.push(Stage::WriteArtifacts);

        // Pack
        self.pack(&mut report)?;

        // Publish
        if request.destination().includes_local() {
            self.settle();
            self.publish_local(&mut report)?;
        }

        if request.destination().includes_remote() {
            self.settle();
            self.publish_remote(&mut report)?;
        }

        // Cleanup
        self.settle();
        remove_if_exists(&report.output_manifest)?;
        debug!(path = %report.output_manifest.display(), "Removed working manifest");
        report.completed.push(Stage::Cleanup);

        if report.is_clean() {
            info!(package, version, "Publish complete");
        } else {
            warn!(
                package,
                version,
                failures = report.failures.len(),
                "Publish finished with failures"
            );
        }

        Ok(report)
    }

    fn pack(&self, report: &mut PublishReport) -> PublishResult<()> {
        ensure_dir(&self.layout.output_dir)?;
        remove_if_exists(&report.artifact)?;

        let command = ToolCommand::Pack {
            manifest: report.output_manifest.clone(),
            output_dir: self.layout.output_dir.clone(),
        };

        let mut ok = self.execute(Stage::Pack, &command, report)?;
        if ok && !report.artifact.is_file() {
            let failure = CommandFailure {
                stage: Stage::Pack,
                command: command.command_line(self.runner.program()),
                exit_code: Some(0),
                reason: format!("expected package {} was not produced", report.artifact.display()),
            };
            self.tolerate(failure, report)?;
            ok = false;
        }

        if ok {
            info!(artifact = %report.artifact.display(), "Packed package");
            report.completed.push(Stage::Pack);
        }
        Ok(())
    }

    fn publish_local(&self, report: &mut PublishReport) -> PublishResult<()> {
        let feed = LocalFeed::new(&self.layout.feed_root);
        info!(feed = %feed.root().display(), "Adding package to local feed");

        feed.ensure_root()?;

        // The package directory marks a completed init, so it is only created
        // once init succeeds and a failed init is retried on the next run.
        let mut ok = true;
        if !feed.has_package(&report.package) {
            info!(package = %report.package, "Initializing local feed for package");
            let init = ToolCommand::InitFeed {
                source_dir: self.layout.working_dir.clone(),
                feed_root: feed.root().to_path_buf(),
            };
            ok = self.execute(Stage::LocalFeed, &init, report)?;
            if ok {
                feed.ensure_package_dir(&report.package)?;
            }
            report.feed_initialized = ok;
        }

        let add = ToolCommand::AddToFeed {
            package: report.artifact.clone(),
            feed_root: feed.root().to_path_buf(),
        };
        ok &= self.execute(Stage::LocalFeed, &add, report)?;

        if ok {
            info!("Added to local feed");
            report.completed.push(Stage::LocalFeed);
        }
        Ok(())
    }

    fn publish_remote(&self, report: &mut PublishReport) -> PublishResult<()> {
        let push = ToolCommand::Push {
            package: report.artifact.clone(),
            source: self.layout.remote_source.clone(),
            config_file: self.layout.source_config_path(&report.package),
            skip_duplicate: true,
        };
        info!(source = %self.layout.remote_source, "Pushing package to remote source");

        if self.execute(Stage::RemotePush, &push, report)? {
            info!("Pushed to remote source");
            report.completed.push(Stage::RemotePush);
        }
        Ok(())
    }

    /// Run one command. Returns whether it succeeded; failures are either
    /// returned as errors or recorded, depending on the policy.
    fn execute(
        &self,
        stage: Stage,
        command: &ToolCommand,
        report: &mut PublishReport,
    ) -> PublishResult<bool> {
        let command_line = command.command_line(self.runner.program());
        info!(stage = %stage, command = %command_line, "Running command");

        let failure = match self.runner.run(command) {
            Ok(output) if output.success => return Ok(true),
            Ok(output) => CommandFailure {
                stage,
                command: command_line,
                exit_code: output.exit_code,
                reason: output.stderr.trim().to_string(),
            },
            Err(e) => CommandFailure {
                stage,
                command: command_line,
                exit_code: None,
                reason: e.to_string(),
            },
        };

        self.tolerate(failure, report)?;
        Ok(false)
    }

    fn tolerate(&self, failure: CommandFailure, report: &mut PublishReport) -> PublishResult<()> {
        match self.policy {
            FailurePolicy::Strict => Err(PublishError::CommandFailed(failure)),
            FailurePolicy::BestEffort => {
                warn!(error = %failure, "Command failed, continuing");
                report.failures.push(failure);
                Ok(())
            }
        }
    }

    fn settle(&self) {
        if !self.settle_delay.is_zero() {
            debug!(delay_ms = self.settle_delay.as_millis() as u64, "Waiting for settle");
            thread::sleep(self.settle_delay);
        }
    }
}

/// Create a directory (and parents) if missing.
fn ensure_dir(dir: &Path) -> PublishResult<()> {
    fs::create_dir_all(dir).map_err(|e| PublishError::CreateDirectoryFailed {
        path: dir.to_path_buf(),
        source: e,
    })
}

/// Delete a file if it exists.
fn remove_if_exists(path: &Path) -> PublishResult<()> {
    if path.exists() {
        fs::remove_file(path).map_err(|e| PublishError::RemoveFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

/// Delete any stale file at `path`, then write `contents`.
///
/// The packaging tool reads the manifest by name, so this is a plain
/// delete-then-write rather than a rename into place.
fn replace_file(path: &Path, contents: &str) -> PublishResult<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    remove_if_exists(path)?;
    fs::write(path, contents).map_err(|e| PublishError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
