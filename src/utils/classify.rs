//! File classification: exclusion rules and binary detection.

use crate::domain::{binary_extensions, FileClass, BINARY_SNIFF_BYTES};
use crate::error::DumpError;
use crate::utils::encoding::{decode_prefix, decode_text};
use globset::{Glob, GlobSet, GlobSetBuilder};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

static BINARY_EXTENSIONS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| binary_extensions().iter().copied().collect());

/// Directory-segment and glob exclusions, matched against repository-relative paths.
#[derive(Debug, Clone)]
pub struct ExclusionRules {
    dirs: HashSet<String>,
    globs: GlobSet,
}

impl ExclusionRules {
    /// Compile exclusion rules. Globs follow shell `fnmatch` semantics, so `*`
    /// also matches across `/`.
    pub fn new(dirs: &[String], globs: &[String]) -> Result<Self, DumpError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in globs {
            let glob = Glob::new(pattern)
                .map_err(|source| DumpError::InvalidGlob { pattern: pattern.clone(), source })?;
            builder.add(glob);
        }
        let globs = builder
            .build()
            .map_err(|source| DumpError::InvalidGlob { pattern: globs.join(", "), source })?;

        Ok(Self { dirs: dirs.iter().cloned().collect(), globs })
    }

    /// Check a `/`-separated relative path against the rules.
    pub fn is_excluded(&self, relative_path: &str) -> bool {
        if relative_path.split('/').any(|segment| self.dirs.contains(segment)) {
            return true;
        }
        self.globs.is_match(relative_path)
    }
}

/// Check the file extension against the known binary set (case-insensitive).
pub fn has_binary_extension(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let ext_with_dot = format!(".{}", ext.to_lowercase());
    BINARY_EXTENSIONS.contains(ext_with_dot.as_str())
}

/// Decide how a file's content should be rendered.
///
/// Returns [`FileClass::Text`], [`FileClass::BinaryByExtension`],
/// [`FileClass::BinaryByContent`] or [`FileClass::Undecodable`]. Only the
/// first [`BINARY_SNIFF_BYTES`] are inspected; files that cannot be read are
/// treated as binary.
pub fn classify_content(path: &Path) -> FileClass {
    if has_binary_extension(path) {
        return FileClass::BinaryByExtension;
    }

    match read_sample(path, BINARY_SNIFF_BYTES) {
        Ok((sample, complete)) => classify_sample(&sample, complete),
        Err(err) => {
            tracing::debug!("Treating unreadable {} as binary: {}", path.display(), err);
            FileClass::BinaryByContent
        }
    }
}

/// Classify a leading sample. `complete` is true when the sample is the whole file.
pub fn classify_sample(sample: &[u8], complete: bool) -> FileClass {
    if sample.contains(&0) {
        return FileClass::BinaryByContent;
    }

    let decoded = if complete { decode_text(sample) } else { decode_prefix(sample) };
    match decoded {
        Some(_) => FileClass::Text,
        None => FileClass::Undecodable,
    }
}

fn read_sample(path: &Path, sample_size: usize) -> io::Result<(Vec<u8>, bool)> {
    let file = File::open(path)?;
    let mut sample = Vec::with_capacity(sample_size);
    // Read one extra byte to learn whether the sample covers the whole file.
    file.take(sample_size as u64 + 1).read_to_end(&mut sample)?;
    let complete = sample.len() <= sample_size;
    sample.truncate(sample_size);
    Ok((sample, complete))
}
