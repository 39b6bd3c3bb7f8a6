//! # Generate Command Implementation
//!
//! Computes every repository, maps it to resources and renders a single
//! Terraform JSON document, written to `--output` or standard output.
//!
//! Both link kinds are on by default; `--no-repository-links` and
//! `--no-branch-links` fall back to literal names.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use log::info;

use repoform::linker::{map_all, Links};
use repoform::render;

use super::ConfigArgs;

/// Generate Terraform JSON for every repository
#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// File to write instead of standard output.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Name repositories literally instead of referencing them.
    #[arg(long)]
    pub no_repository_links: bool,

    /// Name branches literally instead of referencing them.
    #[arg(long)]
    pub no_branch_links: bool,
}

/// Execute the `generate` command.
pub fn execute(args: GenerateArgs) -> Result<()> {
    let links = Links {
        repository: !args.no_repository_links,
        branch: !args.no_branch_links,
    };
    let computed = args.config.compute()?;

    let resources: Vec<_> = computed
        .values()
        .flat_map(|repo| map_all(repo, links))
        .collect();
    let json = render::to_string_pretty(&resources)?;

    match &args.output {
        Some(path) => {
            fs::write(path, format!("{}\n", json))
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote {} resources to {}", resources.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
