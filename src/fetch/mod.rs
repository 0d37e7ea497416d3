//! Repository access: tracked-file listing and metadata queries

use crate::domain::TrackedFile;
use anyhow::Result;
use std::path::Path;

pub mod command;
#[cfg(test)]
pub mod fake;
pub mod git;

pub use command::{run_command, CommandOutput};
pub use git::GitCli;

/// The version-control capabilities the dump needs.
pub trait RepoSource {
    /// Absolute repository root.
    fn root(&self) -> &Path;

    /// Tracked files in listing order.
    fn tracked_files(&self) -> Result<Vec<TrackedFile>>;

    /// Run a metadata query (e.g. `["status", "-sb"]`).
    ///
    /// Best-effort: failures come back as output text, never as errors.
    fn query(&self, args: &[&str]) -> CommandOutput;
}
