//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// repoform - Compute repository configuration and generate Terraform
#[derive(Parser, Debug)]
#[command(name = "repoform")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "warn",
        env = "REPOFORM_LOG"
    )]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every repository with its templates applied
    Compute(commands::compute::ComputeArgs),

    /// Generate Terraform JSON for every repository
    Generate(commands::generate::GenerateArgs),

    /// Check the configuration without generating anything
    Validate(commands::validate::ValidateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::new()
            .parse_filters(&self.log_level)
            .format_timestamp(None)
            .init();

        match self.command {
            Commands::Compute(args) => commands::compute::execute(args),
            Commands::Generate(args) => commands::generate::execute(args),
            Commands::Validate(args) => commands::validate::execute(args),
        }
    }
}
