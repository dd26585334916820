//! Integration tests for the publish pipeline.
//!
//! These tests run the complete flow against a temporary working directory:
//! - request parsing → template rendering → manifest + history copies
//! - command ordering for LOCAL, REMOTE and BOTH destinations
//! - local feed initialization on first publish only
//! - strict and best-effort handling of failing commands
//!
//! External commands go through a recording runner, so no packaging tool is
//! needed. Run with: `cargo test --test publish_integration`

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tempfile::TempDir;

use nupublish::publisher::{
    CommandOutput, CommandRunner, FailurePolicy, PublishError, PublishLayout, PublishRequest,
    Publisher, RequestError, Stage, ToolCommand, SKIP_DUPLICATE_FLAG,
};

// ============================================================================
// Helper Functions
// ============================================================================

const TEMPLATE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<package>
  <metadata>
    <id>SharpWrap</id>
    <version>0.0.0</version>
    <authors>Tools Team</authors>
    <tags>placeholder</tags>
    <releaseNotes></releaseNotes>
    <description>Managed wrapper for the pass-thru API.
    </description>
  </metadata>
</package>
"#;

/// Records every command instead of running it.
///
/// Pack writes the expected `.nupkg` next to the requested output directory,
/// the way the real tool does. Push fails without `-SkipDuplicate` when the
/// remote is set up to already hold the version. Verbs in `fail_once` fail
/// on their first run only.
#[derive(Default)]
struct RecordingRunner {
    commands: RefCell<Vec<ToolCommand>>,
    failing_verbs: Vec<&'static str>,
    fail_once: RefCell<Vec<&'static str>>,
    remote_has_version: bool,
}

impl RecordingRunner {
    fn failing(verbs: &[&'static str]) -> Self {
        Self {
            failing_verbs: verbs.to_vec(),
            ..Default::default()
        }
    }

    fn failing_once(verbs: &[&'static str]) -> Self {
        Self {
            fail_once: RefCell::new(verbs.to_vec()),
            ..Default::default()
        }
    }

    fn verbs(&self) -> Vec<&'static str> {
        self.commands.borrow().iter().map(|c| c.verb()).collect()
    }

    fn clear(&self) {
        self.commands.borrow_mut().clear();
    }
}

impl CommandRunner for RecordingRunner {
    fn program(&self) -> &str {
        "nuget"
    }

    fn run(&self, command: &ToolCommand) -> io::Result<CommandOutput> {
        self.commands.borrow_mut().push(command.clone());

        if self.failing_verbs.contains(&command.verb()) {
            return Ok(CommandOutput::failed(1, format!("{} failed", command.verb())));
        }

        let mut fail_once = self.fail_once.borrow_mut();
        if let Some(pos) = fail_once.iter().position(|v| *v == command.verb()) {
            fail_once.remove(pos);
            return Ok(CommandOutput::failed(1, format!("{} failed", command.verb())));
        }
        drop(fail_once);

        match command {
            ToolCommand::Pack {
                manifest,
                output_dir,
            } => {
                let stem = manifest
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                fs::create_dir_all(output_dir)?;
                fs::write(output_dir.join(format!("{stem}.nupkg")), b"PK")?;
                Ok(CommandOutput::ok(format!("Successfully created package '{stem}'")))
            }
            ToolCommand::Push { skip_duplicate, .. }
                if self.remote_has_version && !skip_duplicate =>
            {
                Ok(CommandOutput::failed(1, "Response status code 409: Conflict"))
            }
            _ => Ok(CommandOutput::ok("")),
        }
    }
}

/// Working directory with a template for `SharpWrap` and a feed root that
/// does not exist yet.
fn setup() -> (TempDir, PublishLayout) {
    let temp = TempDir::new().unwrap();
    let working = temp.path().join("SharpWrap");
    let layout = PublishLayout::new(&working).with_feed_root(temp.path().join("feed"));

    fs::create_dir_all(&layout.template_dir).unwrap();
    fs::write(layout.template_path("SharpWrap"), TEMPLATE).unwrap();

    (temp, layout)
}

fn publisher(layout: &PublishLayout, runner: RecordingRunner) -> Publisher<RecordingRunner> {
    Publisher::new(layout.clone(), runner).with_settle_delay(Duration::ZERO)
}

fn request(args: &[&str]) -> PublishRequest {
    PublishRequest::from_args(args).unwrap()
}

fn files_under(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(files_under(&path));
            } else {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

// ============================================================================
// Integration Tests
// ============================================================================

/// BOTH against a missing feed: pack, init once, add, then push.
#[test]
fn test_both_destinations_initialize_feed_once() {
    let (_temp, layout) = setup();
    let publisher = publisher(&layout, RecordingRunner::default());

    let report = publisher
        .publish(&request(&["SharpWrap", "1.2.0", "j2534", "BOTH"]))
        .unwrap();

    assert_eq!(publisher.runner().verbs(), ["pack", "init", "add", "push"]);
    assert!(report.feed_initialized);
    assert!(report.is_clean());
    assert!(layout.feed_root.is_dir());
    assert!(layout.feed_package_dir("SharpWrap").is_dir());

    // Second version: feed already exists for this package
    publisher.runner().clear();
    let report = publisher
        .publish(&request(&["SharpWrap", "1.2.1", "j2534", "BOTH"]))
        .unwrap();

    assert_eq!(publisher.runner().verbs(), ["pack", "add", "push"]);
    assert!(!report.feed_initialized);
}

/// A failed init leaves no package directory, so the next publish retries it.
#[test]
fn test_failed_feed_init_is_retried() {
    let (_temp, layout) = setup();
    let publisher = publisher(&layout, RecordingRunner::failing_once(&["init"]));

    let result = publisher.publish(&request(&["SharpWrap", "1.2.0", "j2534", "LOCAL"]));

    match result {
        Err(PublishError::CommandFailed(failure)) => {
            assert_eq!(failure.stage, Stage::LocalFeed);
            assert!(failure.command.starts_with("nuget init"));
        }
        other => panic!("expected CommandFailed, got {:?}", other.map(|r| r.completed)),
    }
    assert_eq!(publisher.runner().verbs(), ["pack", "init"]);
    assert!(!layout.feed_package_dir("SharpWrap").exists());

    publisher.runner().clear();
    let report = publisher
        .publish(&request(&["SharpWrap", "1.2.0", "j2534", "LOCAL"]))
        .unwrap();

    assert_eq!(publisher.runner().verbs(), ["pack", "init", "add"]);
    assert!(report.feed_initialized);
    assert!(report.completed.contains(&Stage::LocalFeed));
    assert!(layout.feed_package_dir("SharpWrap").is_dir());
}

/// Best effort records a failed init and still retries it next time.
#[test]
fn test_best_effort_failed_init_is_retried() {
    let (_temp, layout) = setup();
    let publisher = publisher(&layout, RecordingRunner::failing_once(&["init"]))
        .with_failure_policy(FailurePolicy::BestEffort);

    let report = publisher
        .publish(&request(&["SharpWrap", "1.2.0", "j2534", "LOCAL"]))
        .unwrap();
    assert!(!report.feed_initialized);
    assert_eq!(report.failures.len(), 1);
    assert!(!layout.feed_package_dir("SharpWrap").exists());

    publisher.runner().clear();
    let report = publisher
        .publish(&request(&["SharpWrap", "1.2.1", "j2534", "LOCAL"]))
        .unwrap();

    assert_eq!(publisher.runner().verbs(), ["pack", "init", "add"]);
    assert!(report.feed_initialized);
    assert!(report.is_clean());
}

/// BOTH waits before the local step, the push and cleanup.
#[test]
fn test_settle_delay_precedes_each_step() {
    let (_temp, layout) = setup();
    let delay = Duration::from_millis(20);
    let publisher = publisher(&layout, RecordingRunner::default()).with_settle_delay(delay);

    let started = Instant::now();
    let report = publisher
        .publish(&request(&["SharpWrap", "1.2.0", "j2534", "BOTH"]))
        .unwrap();
    let elapsed = started.elapsed();

    assert!(report.is_clean());
    assert!(elapsed >= delay * 3, "elapsed {:?}", elapsed);
}

/// Pack, add and push receive the paths derived from the layout.
#[test]
fn test_command_arguments_follow_layout() {
    let (_temp, layout) = setup();
    let publisher = publisher(&layout, RecordingRunner::default());

    publisher
        .publish(&request(&["SharpWrap", "1.2.0", "j2534", "BOTH"]))
        .unwrap();

    let commands = publisher.runner().commands.borrow().clone();
    let artifact = layout.artifact_path("SharpWrap", "1.2.0");

    assert_eq!(
        commands[0],
        ToolCommand::Pack {
            manifest: layout.output_manifest_path("SharpWrap", "1.2.0"),
            output_dir: layout.output_dir.clone(),
        }
    );
    assert_eq!(
        commands[1],
        ToolCommand::InitFeed {
            source_dir: layout.working_dir.clone(),
            feed_root: layout.feed_root.clone(),
        }
    );
    assert_eq!(
        commands[2],
        ToolCommand::AddToFeed {
            package: artifact.clone(),
            feed_root: layout.feed_root.clone(),
        }
    );
    assert_eq!(
        commands[3],
        ToolCommand::Push {
            package: artifact,
            source: "github".to_string(),
            config_file: layout.source_config_path("SharpWrap"),
            skip_duplicate: true,
        }
    );
    assert!(commands[3]
        .args()
        .iter()
        .any(|a| a.to_str() == Some(SKIP_DUPLICATE_FLAG)));
}

/// REMOTE skips the local feed entirely and tolerates an existing version.
#[test]
fn test_remote_only_skips_duplicate() {
    let (_temp, layout) = setup();
    let runner = RecordingRunner {
        remote_has_version: true,
        ..Default::default()
    };
    let publisher = publisher(&layout, runner);

    let report = publisher
        .publish(&request(&["SharpWrap", "1.2.0", "j2534", "REMOTE"]))
        .unwrap();

    assert_eq!(publisher.runner().verbs(), ["pack", "push"]);
    assert!(report.is_clean());
    assert!(report.completed.contains(&Stage::RemotePush));
    assert!(!layout.feed_root.exists());
}

/// LOCAL never pushes.
#[test]
fn test_local_only_never_pushes() {
    let (_temp, layout) = setup();
    let publisher = publisher(&layout, RecordingRunner::default());

    publisher
        .publish(&request(&["SharpWrap", "1.2.0", "j2534", "local"]))
        .unwrap();

    assert_eq!(publisher.runner().verbs(), ["pack", "init", "add"]);
}

/// Cleanup removes the working manifest; history copy and package remain.
#[test]
fn test_cleanup_keeps_history_and_artifact() {
    let (_temp, layout) = setup();
    let publisher = publisher(&layout, RecordingRunner::default());

    let report = publisher
        .publish(&request(&[
            "SharpWrap",
            "1.2.0",
            "j2534",
            "LOCAL",
            "Timeout fixes -- Retry on busy -- Faster connect",
        ]))
        .unwrap();

    assert!(!report.output_manifest.exists());
    assert!(report.artifact.is_file());
    assert_eq!(
        report.completed,
        [
            Stage::Render,
            Stage::WriteArtifacts,
            Stage::Pack,
            Stage::LocalFeed,
            Stage::Cleanup
        ]
    );

    let history = fs::read_to_string(&report.history_manifest).unwrap();
    assert!(history.contains("<version>1.2.0</version>"));
    assert!(history.contains("<tags>j2534</tags>"));
    assert!(history.contains(
        "<releaseNotes>Timeout fixes\n- Retry on busy\n- Faster connect\n</releaseNotes>"
    ));
    assert!(history.contains(
        "Managed wrapper for the pass-thru API.\nTimeout fixes\n- Retry on busy\n- Faster connect\n</description>"
    ));
    assert!(!history.contains("0.0.0"));
}

/// Without notes, release notes and description keep their template text.
#[test]
fn test_publish_without_notes_keeps_description() {
    let (_temp, layout) = setup();
    let publisher = publisher(&layout, RecordingRunner::default());

    let report = publisher
        .publish(&request(&["SharpWrap", "1.2.0", "j2534", "LOCAL"]))
        .unwrap();

    let history = fs::read_to_string(&report.history_manifest).unwrap();
    assert!(history.contains("<releaseNotes></releaseNotes>"));
    assert!(history.contains("Managed wrapper for the pass-thru API.\n    </description>"));
}

/// Strict policy stops at the first failing command.
#[test]
fn test_strict_failure_aborts() {
    let (_temp, layout) = setup();
    let publisher = publisher(&layout, RecordingRunner::failing(&["add"]));

    let result = publisher.publish(&request(&["SharpWrap", "1.2.0", "j2534", "BOTH"]));

    match result {
        Err(PublishError::CommandFailed(failure)) => {
            assert_eq!(failure.stage, Stage::LocalFeed);
            assert_eq!(failure.exit_code, Some(1));
            assert!(failure.command.starts_with("nuget add"));
        }
        other => panic!("expected CommandFailed, got {:?}", other.map(|r| r.completed)),
    }

    // No push after the failure; working manifest left for inspection
    assert_eq!(publisher.runner().verbs(), ["pack", "init", "add"]);
    assert!(layout.output_manifest_path("SharpWrap", "1.2.0").exists());
}

/// Best-effort policy records failures and keeps going.
#[test]
fn test_best_effort_continues() {
    let (_temp, layout) = setup();
    let publisher = publisher(&layout, RecordingRunner::failing(&["add"]))
        .with_failure_policy(FailurePolicy::BestEffort);

    let report = publisher
        .publish(&request(&["SharpWrap", "1.2.0", "j2534", "BOTH"]))
        .unwrap();

    assert_eq!(publisher.runner().verbs(), ["pack", "init", "add", "push"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].stage, Stage::LocalFeed);
    assert!(!report.is_clean());
    assert!(!report.completed.contains(&Stage::LocalFeed));
    assert!(report.completed.contains(&Stage::RemotePush));
    assert!(report.completed.contains(&Stage::Cleanup));
    assert!(!report.output_manifest.exists());
}

/// A missing template fails before anything is written or run.
#[test]
fn test_missing_template_runs_nothing() {
    let (_temp, layout) = setup();
    let publisher = publisher(&layout, RecordingRunner::default());

    let result = publisher.publish(&request(&["OtherLib", "1.0.0", "misc", "BOTH"]));

    match result {
        Err(PublishError::TemplateNotFound(path)) => {
            assert_eq!(path, layout.template_path("OtherLib"));
        }
        other => panic!("expected TemplateNotFound, got {:?}", other.map(|r| r.completed)),
    }
    assert!(publisher.runner().verbs().is_empty());
    assert!(!layout.output_dir.exists());
}

/// An invalid destination is rejected before the pipeline starts.
#[test]
fn test_invalid_destination_touches_nothing() {
    let (temp, layout) = setup();
    let before = files_under(temp.path());

    let err = PublishRequest::from_args(["SharpWrap", "1.2.0", "j2534", "CLOUD"]).unwrap_err();
    assert_eq!(err, RequestError::InvalidDestination("CLOUD".to_string()));

    assert_eq!(files_under(temp.path()), before);
    assert!(!layout.output_dir.exists());
}

/// Too few arguments is a usage error.
#[test]
fn test_missing_arguments_is_usage_error() {
    assert_eq!(
        PublishRequest::from_args(["SharpWrap", "1.2.0"]).unwrap_err(),
        RequestError::Usage
    );
}

/// Re-publishing the same version produces identical manifests.
#[test]
fn test_republish_same_version_is_idempotent() {
    let (_temp, layout) = setup();
    let publisher = publisher(&layout, RecordingRunner::default());
    let req = request(&["SharpWrap", "1.2.0", "j2534", "LOCAL", "-- Only fix"]);

    let first = publisher.publish(&req).unwrap();
    let first_history = fs::read_to_string(&first.history_manifest).unwrap();

    publisher.runner().clear();
    let second = publisher.publish(&req).unwrap();
    let second_history = fs::read_to_string(&second.history_manifest).unwrap();

    assert_eq!(first_history, second_history);
    assert_eq!(publisher.runner().verbs(), ["pack", "add"]);
    assert!(!second.feed_initialized);
}

/// The template itself is never modified.
#[test]
fn test_template_unchanged_after_publish() {
    let (_temp, layout) = setup();
    let publisher = publisher(&layout, RecordingRunner::default());

    publisher
        .publish(&request(&["SharpWrap", "3.0.0", "j2534", "REMOTE", "Major release"]))
        .unwrap();

    let template = fs::read_to_string(layout.template_path("SharpWrap")).unwrap();
    assert_eq!(template, TEMPLATE);
}
