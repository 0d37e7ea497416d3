//! Merge CLI arguments over file config and defaults.

use crate::config::loader::FileConfig;
use crate::domain::DumpConfig;
use std::path::{Path, PathBuf};

/// Values supplied on the command line. `None` / empty means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub out: Option<PathBuf>,
    pub max_bytes: Option<u64>,
    pub include_diff: bool,
    pub exclude_dirs: Vec<String>,
    pub exclude_globs: Vec<String>,
}

/// Build the run configuration. Precedence is CLI > file > defaults; the
/// exclusion lists are concatenated (defaults, then file, then CLI) with
/// duplicates dropped.
///
/// A relative `out` from the config file is anchored at `repo_root`; a
/// relative `--out` is left for the caller to resolve against the current
/// directory.
pub fn merge_cli_with_config(file: FileConfig, cli: CliOverrides, repo_root: &Path) -> DumpConfig {
    let defaults = DumpConfig::default();

    let output_path = match (cli.out, file.out) {
        (Some(out), _) => out,
        (None, Some(out)) if out.is_relative() => repo_root.join(out),
        (None, Some(out)) => out,
        (None, None) => defaults.output_path,
    };

    DumpConfig {
        output_path,
        max_bytes: cli.max_bytes.or(file.max_bytes).unwrap_or(defaults.max_bytes),
        include_diff: cli.include_diff || file.include_diff.unwrap_or(defaults.include_diff),
        exclude_dirs: union(defaults.exclude_dirs, [file.exclude_dirs, cli.exclude_dirs]),
        exclude_globs: union(defaults.exclude_globs, [file.exclude_globs, cli.exclude_globs]),
    }
}

fn union<const N: usize>(mut base: Vec<String>, extra: [Vec<String>; N]) -> Vec<String> {
    for item in extra.into_iter().flatten() {
        if !base.contains(&item) {
            base.push(item);
        }
    }
    base
}
