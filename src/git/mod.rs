//! Git operations using the system git command.
//!
//! Retrieval is deliberately thin: the only operation the driver needs is
//! cloning an application repository into its declared working copy. Output
//! is inherited so the user sees git's own progress; the exit status is
//! checked and surfaced as a typed error.

use crate::core::DevstackError;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Builder for a git invocation.
#[derive(Debug, Default)]
pub struct GitCommand {
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    clone_url: Option<String>,
}

impl GitCommand {
    /// Create an empty git command.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clone command for the given repository and target.
    #[must_use]
    pub fn clone(url: &str, target: impl AsRef<Path>) -> Self {
        let mut cmd = Self::new();
        cmd.args.push("clone".to_string());
        cmd.args.push("--progress".to_string());
        cmd.args.push(url.to_string());
        cmd.args.push(target.as_ref().display().to_string());
        cmd.clone_url = Some(url.to_string());
        cmd
    }

    /// Append an argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Run git in the given directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Execute the command, inheriting stdio, and check the exit status.
    pub async fn execute(self) -> Result<()> {
        let git = which::which("git").map_err(|_| DevstackError::GitNotFound)?;

        tracing::debug!(target: "git", "Executing command: git {}", self.args.join(" "));

        let mut cmd = Command::new(git);
        cmd.args(&self.args);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }

        let status = cmd
            .status()
            .await
            .with_context(|| format!("Failed to execute git {}", self.args.join(" ")))?;

        if !status.success() {
            let reason = format!("git exited with {status}");
            let error = if let Some(url) = self.clone_url {
                DevstackError::GitCloneFailed { url, reason }
            } else {
                DevstackError::GitCommandError {
                    operation: self
                        .args
                        .first()
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string()),
                    stderr: reason,
                }
            };
            return Err(error.into());
        }

        Ok(())
    }
}

/// Clone an application repository into its working copy.
///
/// Skipped with a notice when the target directory already exists - a
/// previous run (or the user) put the working copy there, and overwriting
/// it could lose local changes.
pub async fn clone_repository(url: &str, target: &Path) -> Result<()> {
    if target.is_dir() {
        tracing::info!(
            target: "git",
            "{} already exists, skipping clone of {url}",
            target.display()
        );
        println!("Repository already present at {}, skipping clone\n", target.display());
        return Ok(());
    }

    GitCommand::clone(url, target).execute().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_clone_builder_shape() {
        let cmd = GitCommand::clone("git@example.com:demo/api.git", "/tmp/demo/api");
        assert_eq!(
            cmd.args,
            vec!["clone", "--progress", "git@example.com:demo/api.git", "/tmp/demo/api"]
        );
        assert_eq!(cmd.clone_url.as_deref(), Some("git@example.com:demo/api.git"));
    }

    #[tokio::test]
    async fn test_existing_target_skips_clone() {
        let temp = tempdir().unwrap();

        // The URL is unreachable; the call must short-circuit before git runs.
        clone_repository("git@invalid.invalid:none.git", temp.path())
            .await
            .unwrap();
    }
}
