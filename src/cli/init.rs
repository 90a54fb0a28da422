//! The `init` command: write a sample configuration document.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

const SAMPLE_CONFIG: &str = r#"{
    "project": "demo",
    "proxyStrategy": "standard",
    "repos": [
        {
            "name": "api",
            "repository": "git@github.com:your-org/api.git",
            "into": "~/stacks/demo/api",
            "framework": "nodejs",
            "domains": "api.local",
            "plugins": []
        }
    ],
    "dbs": ["mysql"],
    "queues": [],
    "custom": []
}
"#;

/// Create a sample configuration document to start from.
#[derive(Args)]
pub struct InitCommand {
    /// Where to write the configuration
    #[arg(default_value = "devstack.json")]
    path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

impl InitCommand {
    /// Write the sample configuration.
    pub async fn execute(self) -> Result<()> {
        if self.path.exists() && !self.force {
            anyhow::bail!(
                "{} already exists; pass --force to overwrite it",
                self.path.display()
            );
        }

        crate::utils::fs::safe_write(&self.path, SAMPLE_CONFIG)?;
        println!(
            "{} Wrote sample configuration to {}",
            "✓".green().bold(),
            self.path.display()
        );
        println!("Edit it, then run: devstack up {}", self.path.display());

        Ok(())
    }
}
