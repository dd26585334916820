//! Output formatting for the publish and history commands.

use super::traits::Output;
use nupublish::publisher::{Destination, HistoryEntry, PublishReport, RequestError, USAGE};

/// Print the usage line and the accepted destinations.
pub fn print_usage(out: &dyn Output) {
    out.println(USAGE);
    out.newline();
    out.println("Destinations:");
    for (destination, description) in Destination::ALL {
        out.indented(&format!("{:<7} {}", destination.as_str(), description));
    }
}

/// Report a rejected request. Nothing has been written or run at this point.
pub fn print_request_error(out: &dyn Output, error: &RequestError) {
    if *error != RequestError::Usage {
        out.error(&error.to_string());
        out.newline();
    }
    print_usage(out);
}

/// Print the outcome of a publish run.
pub fn print_report(out: &dyn Output, report: &PublishReport) {
    out.header(&format!(
        "Published {} {} ({})",
        report.package, report.version, report.destination
    ));
    out.newline();
    out.println(&format!("Manifest: {}", report.history_manifest.display()));
    out.println(&format!("Package:  {}", report.artifact.display()));
    if report.feed_initialized {
        out.println("Local feed initialized for this package");
    }

    out.newline();
    out.subheader("Stages");
    for stage in &report.completed {
        out.success(&stage.to_string());
    }

    if !report.failures.is_empty() {
        out.newline();
        out.subheader(&format!("Failures ({})", report.failures.len()));
        for failure in &report.failures {
            out.warning(&failure.to_string());
        }
    }
}

/// Print archived versions of a package.
pub fn print_history(out: &dyn Output, package: &str, entries: &[HistoryEntry]) {
    if entries.is_empty() {
        out.println(&format!("No published versions of {} found.", package));
        return;
    }

    out.header(&format!("{} ({} versions)", package, entries.len()));
    for entry in entries {
        let modified = entry
            .modified
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        out.indented(&format!("{:<16} {}  {}", entry.version, modified, entry.path.display()));
    }
}
