//! # Compute Command Implementation
//!
//! Prints the computed configuration of every repository as YAML, keyed by
//! repository name. Useful to see what templates actually resolved to.

use anyhow::Result;
use clap::Args;

use super::ConfigArgs;

/// Print every repository with its templates applied
#[derive(Args, Debug)]
pub struct ComputeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Execute the `compute` command.
pub fn execute(args: ComputeArgs) -> Result<()> {
    let computed = args.config.compute()?;
    print!("{}", serde_yaml::to_string(&computed)?);
    Ok(())
}
