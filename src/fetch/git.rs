//! `git` command-line backed repository source

use crate::domain::TrackedFile;
use crate::error::DumpError;
use crate::fetch::{run_command, CommandOutput, RepoSource};
use anyhow::Result;
use std::path::{Path, PathBuf};

const GIT: &str = "git";

/// Repository accessed through the `git` executable on `PATH`.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    /// Resolve the working tree containing `cwd`.
    ///
    /// Fails when `cwd` is not inside a git working tree or git cannot be run.
    pub fn discover(cwd: &Path) -> Result<Self, DumpError> {
        let out = run_command(GIT, &["rev-parse", "--show-toplevel"], cwd)
            .map_err(|source| DumpError::GitUnavailable { source })?;
        if !out.success() || out.text.is_empty() {
            return Err(DumpError::NotARepository { cwd: cwd.to_path_buf(), output: out.text });
        }
        Ok(Self { root: PathBuf::from(out.text) })
    }
}

impl RepoSource for GitCli {
    fn root(&self) -> &Path {
        &self.root
    }

    fn tracked_files(&self) -> Result<Vec<TrackedFile>> {
        let out = run_command(GIT, &["ls-files", "-z"], &self.root)
            .map_err(|source| DumpError::GitUnavailable { source })?;
        if !out.success() {
            return Err(DumpError::ListFailed { output: out.text }.into());
        }
        Ok(parse_ls_files(&self.root, &out.text))
    }

    fn query(&self, args: &[&str]) -> CommandOutput {
        run_command(GIT, args, &self.root).unwrap_or_else(|err| CommandOutput {
            status: None,
            text: format!("failed to run git {}: {}", args.join(" "), err),
        })
    }
}

/// Split NUL-separated `git ls-files -z` output into tracked files under `root`.
///
/// Entries are already `/`-separated and are kept byte for byte: a backslash
/// is an ordinary file name character on POSIX.
pub fn parse_ls_files(root: &Path, output: &str) -> Vec<TrackedFile> {
    output
        .split('\0')
        .filter(|entry| !entry.is_empty())
        .map(|entry| TrackedFile { path: root.join(entry), relative_path: entry.to_string() })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::process::Command;
    use tempfile::TempDir;

    fn git_available() -> bool {
        Command::new("git").arg("--version").output().map(|o| o.status.success()).unwrap_or(false)
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git").args(args).current_dir(dir).status().expect("run git");
        assert!(status.success(), "git {:?} failed", args);
    }

    #[test]
    fn test_parse_ls_files_drops_empty_entries() {
        let root = Path::new("/repo");
        let files = parse_ls_files(root, "a.txt\0dir/b.rs\0\0with space.md\0");
        let rels: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(rels, vec!["a.txt", "dir/b.rs", "with space.md"]);
        assert_eq!(files[1].path, PathBuf::from("/repo/dir/b.rs"));
    }

    #[test]
    fn test_parse_ls_files_keeps_backslash_in_name() {
        let files = parse_ls_files(Path::new("/repo"), "a\\b.txt\0");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "a\\b.txt");
        assert_eq!(files[0].path, Path::new("/repo").join("a\\b.txt"));
    }

    #[test]
    fn test_parse_ls_files_empty_output() {
        assert!(parse_ls_files(Path::new("/repo"), "").is_empty());
    }

    #[test]
    fn test_discover_outside_repository_fails() {
        if !git_available() {
            eprintln!("skipping: git not available");
            return;
        }
        let dir = TempDir::new().unwrap();
        // Keep git from walking up into an enclosing repository.
        let isolated = dir.path().join("isolated");
        fs::create_dir(&isolated).unwrap();
        let probe = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(&isolated)
            .output()
            .unwrap();
        if probe.status.success() {
            eprintln!("skipping: temp dir is inside a git repository");
            return;
        }

        let err = GitCli::discover(&isolated).unwrap_err();
        assert!(matches!(err, DumpError::NotARepository { .. }));
    }

    #[test]
    fn test_discover_and_list_tracked_files() {
        if !git_available() {
            eprintln!("skipping: git not available");
            return;
        }
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        git(root, &["init", "-q"]);
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/lib.rs"), "pub fn f() {}\n").unwrap();
        fs::write(root.join("README.md"), "# hi\n").unwrap();
        fs::write(root.join("untracked.txt"), "nope\n").unwrap();
        git(root, &["add", "src/lib.rs", "README.md"]);

        let nested = root.join("src");
        let repo = GitCli::discover(&nested).expect("discover");
        assert_eq!(
            repo.root().canonicalize().unwrap(),
            root.canonicalize().unwrap(),
            "root should resolve to the top of the working tree"
        );

        let files = repo.tracked_files().expect("ls-files");
        let rels: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(rels, vec!["README.md", "src/lib.rs"]);
        assert!(files.iter().all(|f| f.path.exists()));

        let status = repo.query(&["status", "--porcelain"]);
        assert!(status.success());
        assert!(status.text.contains("untracked.txt"));
    }
}
