//! The host alias synchronizer.
//!
//! After the descriptor is committed, every collected domain is mapped to
//! `127.0.0.1` in the hosts file so the generated vhosts are reachable from
//! the local browser. Each written line is tagged with a trailing
//! `#<project>-docker` sentinel; a run first purges every line carrying the
//! sentinel and then appends one fresh line, which makes the operation
//! idempotent across repeated runs for the same project.
//!
//! Concurrent runs for different projects race on the same file with no
//! locking; last writer wins on the lines it touches.

use crate::compose::RunContext;
use crate::constants::{DEFAULT_HOSTS_FILE, HOSTS_TAG_SUFFIX};
use crate::utils::fs::atomic_write;
use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};

/// The hosts file to patch.
#[derive(Debug, Clone)]
pub struct HostsFile {
    path: PathBuf,
}

impl HostsFile {
    /// Patch an arbitrary hosts file (used by tests and the
    /// `--hosts-file` override).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Patch the system hosts file.
    #[must_use]
    pub fn system() -> Self {
        Self::new(DEFAULT_HOSTS_FILE)
    }

    /// The file being patched.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the file: drop every line tagged with the project's
    /// sentinel, then append one line mapping `127.0.0.1` to every
    /// collected domain.
    ///
    /// Leaves the file untouched when no routable site was collected.
    pub fn sync(&self, ctx: &RunContext) -> Result<()> {
        if ctx.sites().is_empty() {
            return Ok(());
        }

        let tag = format!("{}{}", ctx.project(), HOSTS_TAG_SUFFIX);
        let stale = Regex::new(&format!(".*{}.*", regex::escape(&tag)))
            .context("Failed to build hosts sentinel pattern")?;

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read hosts file {}", self.path.display())
                });
            }
        };

        let mut lines: Vec<&str> = content
            .lines()
            .filter(|line| !stale.is_match(line))
            .collect();

        let domains: Vec<&str> = ctx
            .sites()
            .iter()
            .flat_map(|site| site.domains.iter().map(String::as_str))
            .collect();
        let entry = format!("127.0.0.1 {} #{tag}", domains.join(" "));

        tracing::debug!(
            target: "hosts",
            "Patching {} with: {entry}",
            self.path.display()
        );

        lines.push(&entry);
        let mut updated = lines.join("\n");
        updated.push('\n');

        atomic_write(&self.path, updated.as_bytes())
            .with_context(|| format!("Failed to update hosts file {}", self.path.display()))
    }
}
