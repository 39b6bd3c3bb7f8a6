//! # repoform CLI
//!
//! This is the binary entry point for the `repoform` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Initializing logging for the library's `log` output.
//! - Executing the selected command and reporting its errors.
//!
//! The configuration logic lives in the `repoform` library crate; the binary
//! only wires it to files and the terminal.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
