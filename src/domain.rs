//! Core types shared across the dump pipeline.

use std::path::PathBuf;

/// Report file name used when `--out` is not given.
pub const DEFAULT_OUTPUT_FILE: &str = "repo_dump.txt";

/// Bytes sampled from the start of a file when sniffing for binary content.
pub const BINARY_SNIFF_BYTES: usize = 8192;

/// Read size used when hashing omitted files.
pub const HASH_CHUNK_BYTES: usize = 1024 * 1024;

/// Directory names that are always excluded, wherever they appear in a path.
pub fn default_exclude_dirs() -> &'static [&'static str] {
    &[
        ".git",
        "node_modules",
        "dist",
        "build",
        ".venv",
        "venv",
        "__pycache__",
        ".mypy_cache",
        ".pytest_cache",
        ".ruff_cache",
        ".tox",
        ".idea",
        ".vscode",
    ]
}

/// Extensions (lowercase, with leading dot) whose content is never embedded.
pub fn binary_extensions() -> &'static [&'static str] {
    &[
        ".png", ".jpg", ".jpeg", ".gif", ".webp", ".bmp", ".ico", ".pdf", ".zip", ".7z", ".rar",
        ".tar", ".gz", ".exe", ".dll", ".so", ".dylib", ".bin", ".dat", ".mp3", ".wav", ".mp4",
        ".mov", ".mkv", ".ttf", ".otf", ".woff", ".woff2",
    ]
}

/// Settings for a single dump run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpConfig {
    pub output_path: PathBuf,
    /// Truncate text files larger than this many bytes; `0` disables truncation.
    pub max_bytes: u64,
    pub include_diff: bool,
    pub exclude_dirs: Vec<String>,
    pub exclude_globs: Vec<String>,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            max_bytes: 0,
            include_diff: false,
            exclude_dirs: default_exclude_dirs().iter().map(|s| s.to_string()).collect(),
            exclude_globs: Vec::new(),
        }
    }
}

/// A file reported by `git ls-files`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    /// Absolute path under the repository root.
    pub path: PathBuf,
    /// Repository-relative path with `/` separators.
    pub relative_path: String,
}

/// How a tracked file is rendered in the dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    Text,
    BinaryByExtension,
    BinaryByContent,
    Undecodable,
    Excluded,
    Missing,
}

impl FileClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::BinaryByExtension => "binary-extension",
            Self::BinaryByContent => "binary-content",
            Self::Undecodable => "undecodable",
            Self::Excluded => "excluded",
            Self::Missing => "missing",
        }
    }
}

/// Counters accumulated while writing the dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpStats {
    pub text_files: usize,
    pub binary_or_omitted_files: usize,
    pub skipped_files: usize,
}
