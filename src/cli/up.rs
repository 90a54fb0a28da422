//! The `up` command: the full provision pipeline.
//!
//! Reads the configuration document and drives every stage in order:
//!
//! 1. per unit: clone the repository, build and append its descriptor
//!    section (collecting routable sites on the way)
//! 2. regenerate the vhost files for every routable site
//! 3. append the proxy, database, queue, custom and network sections and
//!    commit the descriptor atomically
//! 4. synchronize the hosts file
//! 5. build and start the containers
//! 6. run each unit's post-provision hooks
//!
//! Every external step's exit status is checked; the first failure stops
//! the run. The descriptor is only committed when fully built, so a failed
//! run never leaves a half-written one behind.

use crate::cli::common::{banner, done};
use crate::compose::{self, ComposeDocument, RunContext, service};
use crate::config::StackConfig;
use crate::hosts::HostsFile;
use crate::vhost::VhostEngine;
use crate::workspace::Workspace;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Compile the topology, then clone, start and provision the stack.
#[derive(Args)]
pub struct UpCommand {
    /// Path to the configuration document
    config: PathBuf,
}

impl UpCommand {
    /// Execute the full pipeline.
    pub async fn execute(self, hosts_override: Option<PathBuf>) -> Result<()> {
        banner(&format!("Parsing {}", self.config.display()));
        let config = StackConfig::load(&self.config)?;
        let ws = Workspace::from_config_path(&self.config)?;
        done();

        let mut ctx = RunContext::new(&config);
        let mut doc = ComposeDocument::new();

        for unit in &config.repos {
            let path = unit.expanded_path()?;

            banner(&format!(
                "Cloning project: {} into folder: {}",
                unit.repository,
                path.display()
            ));
            crate::git::clone_repository(&unit.repository, &path).await?;
            done();

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

        banner("Updating hosts file");
        let hosts = hosts_override
            .map(HostsFile::new)
            .unwrap_or_else(HostsFile::system);
        hosts.sync(&ctx)?;
        done();

        banner("Starting containers");
        crate::docker::compose_up(&config.project, ws.root()).await?;
        done();

        for unit in &config.repos {
            let path = unit.expanded_path()?;
            crate::hooks::run_plugins(&config.project, unit, &path, &ws).await?;
        }

        Ok(())
    }
}
