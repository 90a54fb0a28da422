//! Devstack CLI entry point.
//!
//! Parses command-line arguments, executes the selected command and maps
//! any failure to a user-friendly error display before exiting with a
//! non-zero status.

use anyhow::Result;
use clap::Parser;
use devstack_cli::cli;
use devstack_cli::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
