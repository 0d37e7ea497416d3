//! Fatal error conditions.
//!
//! Everything else is propagated with `anyhow`; these variants name the cases
//! that abort a run before any report is produced.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("Not inside a git repo (git rev-parse failed in {cwd}):\n{output}")]
    NotARepository { cwd: PathBuf, output: String },

    #[error("git ls-files failed:\n{output}")]
    ListFailed { output: String },

    #[error("Failed to run git: {source}")]
    GitUnavailable {
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid exclude glob '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}
