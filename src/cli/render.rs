//! The `render` command: generation without side effects on the system.
//!
//! Runs the topology compiler end to end - descriptor and vhost files - but
//! performs no clone, no hosts-file patch, no container start and no hooks.
//! Useful to inspect what `up` would produce, and as a hermetic surface for
//! tests.

use crate::cli::common::{banner, done};
use crate::compose::{self, ComposeDocument, RunContext, service};
use crate::config::StackConfig;
use crate::vhost::VhostEngine;
use crate::workspace::Workspace;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Compile the descriptor and vhost files without touching the system.
#[derive(Args)]
pub struct RenderCommand {
    /// Path to the configuration document
    config: PathBuf,
}

impl RenderCommand {
    /// Execute the generation pipeline.
    pub async fn execute(self) -> Result<()> {
        banner(&format!("Parsing {}", self.config.display()));
        let config = StackConfig::load(&self.config)?;
        let ws = Workspace::from_config_path(&self.config)?;
        done();

        let mut ctx = RunContext::new(&config);
        let mut doc = ComposeDocument::new();

        for unit in &config.repos {
            let path = unit.expanded_path()?;

            banner(&format!("Writing {} service: {}", unit.framework, unit.name));
            if let Some(section) = service::unit_section(&mut ctx, unit, &path, &ws)
                .with_context(|| format!("Failed to build service section for '{}'", unit.name))?
            {
                doc.append_section(&section);
            }
            done();
        }

        banner("Creating nginx vhost files");
        VhostEngine::new(&ws).generate(&ctx)?;
        done();

        banner("Writing proxy, backing services and network");
        compose::append_stack_sections(&config, &ctx, &mut doc)?;
        doc.commit(&ws.compose_file())?;
        done();

        println!(
            "Rendered {} and {} vhost file(s)",
            ws.compose_file().display(),
            ctx.sites().len()
        );

        Ok(())
    }
}
