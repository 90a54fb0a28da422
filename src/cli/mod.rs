//! Command-line interface.
//!
//! Each command lives in its own module with an argument struct and an
//! async `execute()`:
//!
//! - `up` - the full pipeline: compile, clone, start, provision
//! - `render` - generation only, no system side effects
//! - `init` - write a sample configuration document
//!
//! Global flags control verbosity (`--verbose`/`--quiet`, mapped onto the
//! tracing filter) and where hosts-file patches land (`--hosts-file`,
//! defaulting to the system file).

pub mod common;
mod init;
mod render;
mod up;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Top-level CLI structure.
#[derive(Parser)]
#[command(
    name = "devstack",
    about = "Compile a declarative service topology into docker-compose, nginx vhosts and hosts-file entries",
    version,
    long_about = "Devstack reads a JSON description of a multi-service project and derives \
                  the docker-compose descriptor, per-service nginx vhosts and local DNS \
                  overrides, then clones, builds and starts the stack."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose (debug-level) output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Hosts file to patch instead of /etc/hosts
    #[arg(long, global = true)]
    hosts_file: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Compile the topology, then clone, start and provision the stack
    Up(up::UpCommand),

    /// Compile the descriptor and vhost files without touching the system
    Render(render::RenderCommand),

    /// Write a sample configuration document
    Init(init::InitCommand),
}

impl Cli {
    /// Initialize tracing and dispatch to the selected command.
    pub async fn execute(self) -> Result<()> {
        self.init_tracing();

        match self.command {
            Commands::Up(cmd) => cmd.execute(self.hosts_file).await,
            Commands::Render(cmd) => cmd.execute().await,
            Commands::Init(cmd) => cmd.execute().await,
        }
    }

    /// Set up the tracing subscriber once, honoring `RUST_LOG` unless a
    /// verbosity flag overrides it.
    fn init_tracing(&self) {
        let filter = if self.verbose {
            EnvFilter::new("debug")
        } else if self.quiet {
            EnvFilter::new("error")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init();
    }
}
