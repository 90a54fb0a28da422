//! Container runtime invocation.
//!
//! The stack is started with the compose CLI plugin from the stack root,
//! namespaced by the project name. Output is captured while a spinner shows
//! progress; on failure the tail of the captured stderr is surfaced in the
//! typed error.

use crate::core::DevstackError;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

/// Build and start the generated stack:
/// `docker compose -p <project> up -d --build`.
pub async fn compose_up(project: &str, stack_root: &Path) -> Result<()> {
    let docker = which::which("docker").map_err(|_| DevstackError::DockerNotFound)?;

    let args = ["compose", "-p", project, "up", "-d", "--build"];
    tracing::debug!(
        target: "docker",
        "Executing command in {}: docker {}",
        stack_root.display(),
        args.join(" ")
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("static spinner template is valid"),
    );
    spinner.set_message("Building images and starting containers (this may take a while)...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = Command::new(docker)
        .args(args)
        .current_dir(stack_root)
        .output()
        .await
        .with_context(|| format!("Failed to execute docker compose for project '{project}'"))?;

    spinner.finish_and_clear();

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::debug!(
            target: "docker",
            "Command failed with exit code: {:?}",
            output.status.code()
        );
        return Err(DevstackError::DockerCommandError {
            operation: "compose up".to_string(),
            reason: if stderr.is_empty() {
                format!("docker exited with {}", output.status)
            } else {
                stderr.trim_end().to_string()
            },
        }
        .into());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.is_empty() {
        tracing::debug!(target: "docker", "{}", stdout.trim());
    }

    Ok(())
}
