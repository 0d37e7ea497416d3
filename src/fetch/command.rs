//! Synchronous external command execution

use crate::utils::decode_or_replace;
use std::io;
use std::path::Path;
use std::process::Command;

/// Exit status and decoded output of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` when the process was killed by a signal.
    pub status: Option<i32>,
    /// Stdout followed by stderr, decoded, with trailing whitespace removed.
    pub text: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Run `program` with `args` in `cwd`, blocking until it exits.
///
/// A non-zero exit is returned as a normal result; only a failure to spawn
/// the process is an error.
pub fn run_command(program: &str, args: &[&str], cwd: &Path) -> io::Result<CommandOutput> {
    let output = Command::new(program).args(args).current_dir(cwd).output()?;

    let mut combined = output.stdout;
    combined.extend_from_slice(&output.stderr);
    // Leading whitespace is significant (`git status --porcelain` columns).
    let text = decode_or_replace(&combined).trim_end().to_string();
    let status = output.status.code();

    tracing::debug!("{} {} -> {:?} ({} bytes)", program, args.join(" "), status, text.len());

    Ok(CommandOutput { status, text })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_captures_stdout_and_stderr() {
        let dir = TempDir::new().unwrap();
        let out =
            run_command("sh", &["-c", "echo out; echo err 1>&2"], dir.path()).expect("run sh");
        assert!(out.success());
        assert_eq!(out.text, "out\nerr");
    }

    #[test]
    fn test_nonzero_status_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let out = run_command("sh", &["-c", "echo nope; exit 3"], dir.path()).expect("run sh");
        assert!(!out.success());
        assert_eq!(out.status, Some(3));
        assert_eq!(out.text, "nope");
    }

    #[test]
    fn test_keeps_leading_whitespace() {
        let dir = TempDir::new().unwrap();
        let out = run_command("sh", &["-c", "printf ' M a.txt\\n\\n'"], dir.path()).expect("run sh");
        assert_eq!(out.text, " M a.txt");
    }

    #[test]
    fn test_runs_in_working_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();
        let out = run_command("ls", &[], dir.path()).expect("run ls");
        assert!(out.text.contains("marker.txt"));
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(run_command("definitely-not-a-real-program-xyz", &[], dir.path()).is_err());
    }

    #[test]
    fn test_invalid_output_bytes_are_replaced() {
        let dir = TempDir::new().unwrap();
        let out = run_command("printf", &["a\\377\\377"], dir.path()).expect("run printf");
        assert_eq!(out.text, "a\u{fffd}\u{fffd}");
    }
}
