//! Post-provision hooks.
//!
//! After the stack is up, each unit's declared plugin names are resolved to
//! scripts under `<stack-root>/plugins/` and run with fixed positional
//! arguments. Hooks are framework-specific setup steps (dependency install,
//! key generation, migrations); their internals belong to the scripts.
//!
//! Exit statuses are checked: a failing hook stops the run with a typed
//! error instead of being silently ignored. Unknown plugin names are
//! skipped with a diagnostic - a typo in one hook should not take down an
//! otherwise healthy provision.

use crate::config::{FrameworkKind, ServiceUnit};
use crate::core::DevstackError;
use crate::utils::banner;
use crate::workspace::Workspace;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::process::Command;

/// Run every declared plugin for one unit.
pub async fn run_plugins(
    project: &str,
    unit: &ServiceUnit,
    path: &Path,
    ws: &Workspace,
) -> Result<()> {
    if unit.plugins.is_empty() {
        return Ok(());
    }

    banner(&format!("Running plugins for {}", unit.name));

    for plugin in &unit.plugins {
        match plugin.as_str() {
            "laravel" => {
                let FrameworkKind::Laravel { version } = &unit.framework else {
                    tracing::warn!(
                        target: "hooks",
                        "Unit '{}' declares the laravel hook but is {}; skipping",
                        unit.name,
                        unit.framework
                    );
                    println!(
                        "Skipping laravel hook for '{}': unit framework is {}\n",
                        unit.name, unit.framework
                    );
                    continue;
                };

                let unit_path = path.display().to_string();
                run_hook(
                    ws.plugin_script("laravel.sh"),
                    &[unit_path.as_str(), project, unit.name.as_str(), version],
                    plugin,
                    unit,
                )
                .await?;
            }
            "composer" => {
                let unit_path = path.display().to_string();
                run_hook(
                    ws.plugin_script("composer.sh"),
                    &[unit_path.as_str()],
                    plugin,
                    unit,
                )
                .await?;
            }
            other => {
                tracing::warn!(target: "hooks", "Unknown plugin '{other}' on unit '{}'", unit.name);
                println!("Unknown plugin '{other}' on unit '{}', skipping\n", unit.name);
            }
        }
    }

    Ok(())
}

async fn run_hook(
    script: std::path::PathBuf,
    args: &[&str],
    hook: &str,
    unit: &ServiceUnit,
) -> Result<()> {
    tracing::debug!(
        target: "hooks",
        "Executing hook: {} {}",
        script.display(),
        args.join(" ")
    );

    let status = Command::new(&script)
        .args(args)
        .status()
        .await
        .with_context(|| format!("Failed to execute hook script {}", script.display()))?;

    if !status.success() {
        return Err(DevstackError::HookFailed {
            hook: hook.to_string(),
            unit: unit.name.clone(),
            reason: format!("{} exited with {status}", script.display()),
        }
        .into());
    }

    Ok(())
}
