//! repo-dump: dump a git repository's tracked files for LLM review

use anyhow::Result;

fn main() -> Result<()> {
    repo_dump::cli::run()
}
