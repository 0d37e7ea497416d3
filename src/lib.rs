//! repo-dump: dump a git repository into one reviewable text file
//!
//! Tracked files are listed with `git ls-files`, classified as text or
//! binary, and written into a single report with a metadata header and a
//! summary. Binary and undecodable files are recorded by size and SHA-256.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod render;
pub mod utils;
