//! # CLI Command Implementations
//!
//! Each subcommand of `repoform` lives in its own file with:
//! - an `Args` struct, derived using `clap`;
//! - an `execute` function running the command against the `repoform`
//!   library.
//!
//! Every command starts from the same place: load the configuration
//! directory and compute the whole batch.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use log::info;

use repoform::compute::compute_all;
use repoform::config::RepoConfig;
use repoform::loader;

pub mod compute;
pub mod generate;
pub mod validate;

/// Where the configuration is read from.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Directory of YAML configuration files, or a single file.
    #[arg(
        long,
        value_name = "DIR",
        default_value = ".",
        env = "REPOFORM_CONFIG_DIR"
    )]
    pub config_dir: PathBuf,
}

impl ConfigArgs {
    /// Loads the configuration and computes every repository.
    pub fn compute(&self) -> Result<BTreeMap<String, RepoConfig>> {
        let config = loader::load_dir(&self.config_dir).with_context(|| {
            format!(
                "failed to load configuration from {}",
                self.config_dir.display()
            )
        })?;
        info!(
            "computing {} repositories from {}",
            config.repositories.len(),
            self.config_dir.display()
        );
        Ok(compute_all(&config)?)
    }
}
