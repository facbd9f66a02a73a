//! Subprocess invocation - structured execution of external commands
//!
//! Every external command goes through [`run_command`], which echoes the
//! planned invocation to stdout before running it (the `--> ...` lines that
//! make a run readable as a dry-run log) and returns a [`CommandOutput`]
//! with the exit status and captured streams instead of leaking raw shell
//! behavior to callers.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// Captured result of a finished external command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Whether the command exited with status zero
    pub success: bool,

    /// Exit code, if the process exited normally
    pub code: Option<i32>,

    /// Captured standard output
    pub stdout: String,

    /// Captured standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Compact one-line failure description for summaries
    ///
    /// Prefers the last stderr line (git puts its `fatal:` message there),
    /// falling back to the exit status.
    pub fn error_summary(&self) -> String {
        let stderr = self.stderr.trim();
        if let Some(line) = stderr.lines().last() {
            return line.to_string();
        }

        match self.code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Render a program and its arguments as the line echoed before execution
pub fn render_command(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Run an external command in `cwd`, echoing the planned invocation first
///
/// A non-zero exit is not an error here: it comes back as a `CommandOutput`
/// with `success == false` for the caller to turn into a per-entry outcome.
/// Only failure to spawn the process at all (missing binary, unusable
/// working directory) propagates as an error.
pub async fn run_command(program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput> {
    let rendered = render_command(program, args);
    println!("--> {}", rendered);
    debug!("Running `{}` in {}", rendered, cwd.display());

    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .await
        .with_context(|| format!("Failed to execute `{}`", rendered))?;

    Ok(CommandOutput {
        success: output.status.success(),
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_command_with_args() {
        assert_eq!(
            render_command("git", &["clone", "https://example.com/x.git", "x"]),
            "git clone https://example.com/x.git x"
        );
    }

    #[test]
    fn test_render_command_without_args() {
        assert_eq!(render_command("git", &[]), "git");
    }

    #[test]
    fn test_error_summary_prefers_last_stderr_line() {
        let output = CommandOutput {
            success: false,
            code: Some(128),
            stdout: String::new(),
            stderr: "Cloning into 'x'...\nfatal: repository not found\n".to_string(),
        };

        assert_eq!(output.error_summary(), "fatal: repository not found");
    }

    #[test]
    fn test_error_summary_falls_back_to_exit_code() {
        let output = CommandOutput {
            success: false,
            code: Some(1),
            stdout: String::new(),
            stderr: "   \n".to_string(),
        };

        assert_eq!(output.error_summary(), "exited with status 1");
    }

    #[tokio::test]
    async fn test_run_command_captures_stdout() {
        let temp = TempDir::new().unwrap();

        let output = run_command("git", &["--version"], temp.path())
            .await
            .expect("git should be runnable");

        assert!(output.success);
        assert_eq!(output.code, Some(0));
        assert!(output.stdout.contains("git version"));
    }

    #[tokio::test]
    async fn test_run_command_reports_failure_without_erroring() {
        let temp = TempDir::new().unwrap();

        let output = run_command("git", &["definitely-not-a-subcommand"], temp.path())
            .await
            .expect("spawn should succeed even when git fails");

        assert!(!output.success);
        assert!(!output.error_summary().is_empty());
    }

    #[tokio::test]
    async fn test_run_command_missing_binary_is_an_error() {
        let temp = TempDir::new().unwrap();

        let result = run_command("schemekeeper-no-such-binary", &[], temp.path()).await;
        assert!(result.is_err());
    }
}
