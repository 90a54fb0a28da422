//! Output helpers shared by the CLI commands.

pub use crate::utils::banner;

/// Print the phase-completed marker.
pub fn done() {
    println!("DONE!\n");
}
