//! Dump command implementation

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::fetch::{GitCli, RepoSource};
use crate::render::write_dump_file;

#[derive(Args)]
pub struct DumpArgs {
    /// Output file (default: repo_dump.txt in the current directory)
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Truncate text files larger than this, keeping head and tail (0 = no limit)
    #[arg(long, value_name = "BYTES")]
    pub max_bytes: Option<u64>,

    /// Include `git diff` in the header
    #[arg(long)]
    pub include_diff: bool,

    /// Additional directory name to exclude (repeatable)
    #[arg(long, value_name = "NAME")]
    pub exclude_dir: Vec<String>,

    /// Exclude repository-relative paths matching this glob (repeatable)
    #[arg(long, value_name = "PATTERN")]
    pub exclude_glob: Vec<String>,

    /// Path to config file (repo-dump.toml or .repo-dump.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn run(args: DumpArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let repo = GitCli::discover(&cwd)?;

    let file_config = load_config(repo.root(), args.config.as_deref())?;
    let cli_overrides = CliOverrides {
        out: args.out,
        max_bytes: args.max_bytes,
        include_diff: args.include_diff,
        exclude_dirs: args.exclude_dir,
        exclude_globs: args.exclude_glob,
    };
    let config = merge_cli_with_config(file_config, cli_overrides, repo.root());
    tracing::debug!("Resolved config: {:?}", config);

    let outcome = write_dump_file(&repo, &config)?;
    tracing::debug!(
        "text: {}, binary/omitted: {}, skipped: {}",
        outcome.stats.text_files,
        outcome.stats.binary_or_omitted_files,
        outcome.stats.skipped_files
    );

    println!("Wrote: {}", outcome.path.display());
    println!("Bytes: {}", outcome.bytes);
    Ok(())
}
