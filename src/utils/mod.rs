//! Cross-cutting utilities.

pub mod fs;

use colored::Colorize;

/// Print a status banner to standard output.
///
/// All user-facing phase and diagnostic messages share this fixed style.
pub fn banner(msg: &str) {
    let width = msg.len() + 10;
    println!("{}", "-".repeat(width));
    println!("|    {}    |", msg.bold());
    println!("{}\n", "-".repeat(width));
}
