//! Package publisher: from command-line request to published package.
//!
//! # Overview
//!
//! The publisher workflow for one request:
//! 1. Validate the request ([`PublishRequest::from_args`])
//! 2. Render the package's manifest template
//! 3. Write the working manifest and its history copy
//! 4. Pack the manifest with the external packaging tool
//! 5. Add the package to the local feed and/or push it to the remote source
//! 6. Remove the working manifest
//!
//! Every path comes from a [`PublishLayout`] resolved once up front, and every
//! external command goes through a [`CommandRunner`], so the whole pipeline
//! runs against a temporary directory and a recording runner in tests.
//!
//! # Example
//!
//! ```ignore
//! use nupublish::publisher::{NugetRunner, PublishLayout, PublishRequest, Publisher};
//!
//! let request = PublishRequest::from_args(["SharpWrap", "1.2.0", "j2534", "BOTH"])?;
//! let layout = PublishLayout::new("/src/SharpWrap").with_feed_root("/srv/nuget");
//! let runner = NugetRunner::new("nuget", &layout.working_dir);
//!
//! let report = Publisher::new(layout, runner).publish(&request)?;
//! println!("Published {}", report.artifact.display());
//! ```

mod error;
mod feed;
mod history;
mod layout;
mod pipeline;
mod request;
mod runner;

pub use error::{CommandFailure, PublishError, PublishResult};
pub use feed::LocalFeed;
pub use history::{compare_versions, list_history, HistoryEntry};
pub use layout::{
    default_feed_root, resolve_path, PublishLayout, DEFAULT_MANIFEST_EXTENSION,
    DEFAULT_OUTPUT_DIR, DEFAULT_REMOTE_SOURCE, DEFAULT_TEMPLATE_DIR, PACKAGE_EXTENSION,
};
pub use pipeline::{FailurePolicy, PublishReport, Publisher, Stage, DEFAULT_SETTLE_DELAY};
pub use request::{is_version_shaped, Destination, PublishRequest, RequestError, USAGE};
pub use runner::{
    CommandOutput, CommandRunner, NugetRunner, ToolCommand, DEFAULT_EXECUTABLE,
    SKIP_DUPLICATE_FLAG,
};
