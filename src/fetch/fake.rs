//! In-memory repository source for tests.

use crate::domain::TrackedFile;
use crate::fetch::{CommandOutput, RepoSource};
use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temp directory posing as a working tree, with canned metadata answers.
pub struct FakeSource {
    dir: TempDir,
    tracked: Vec<String>,
    answers: HashMap<String, CommandOutput>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self { dir: TempDir::new().expect("temp repo"), tracked: Vec::new(), answers: HashMap::new() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Write a file and mark it tracked.
    pub fn track(&mut self, relative_path: &str, content: &[u8]) -> &mut Self {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(&path, content).expect("write tracked file");
        self.tracked.push(relative_path.to_string());
        self
    }

    /// Mark a path tracked without creating it on disk.
    pub fn track_missing(&mut self, relative_path: &str) -> &mut Self {
        self.tracked.push(relative_path.to_string());
        self
    }

    pub fn answer(&mut self, args: &str, text: &str) -> &mut Self {
        self.answers
            .insert(args.to_string(), CommandOutput { status: Some(0), text: text.to_string() });
        self
    }
}

impl RepoSource for FakeSource {
    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn tracked_files(&self) -> Result<Vec<TrackedFile>> {
        Ok(self
            .tracked
            .iter()
            .map(|rel| TrackedFile { path: self.dir.path().join(rel), relative_path: rel.clone() })
            .collect())
    }

    fn query(&self, args: &[&str]) -> CommandOutput {
        self.answers
            .get(&args.join(" "))
            .cloned()
            .unwrap_or(CommandOutput { status: Some(0), text: String::new() })
    }
}
