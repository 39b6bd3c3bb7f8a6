//! # Validate Command Implementation
//!
//! Loads and computes the configuration, then runs the lints on every
//! computed repository. Errors always fail the command; lint warnings only
//! fail it with `--strict`.
//!
//! This command is read-only.

use anyhow::{bail, Result};
use clap::Args;

use repoform::lint;

use super::ConfigArgs;

/// Check the configuration without generating anything
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Fail on lint warnings too.
    #[arg(long)]
    pub strict: bool,
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs) -> Result<()> {
    let computed = args.config.compute()?;

    let mut warnings = 0;
    for (name, repo) in &computed {
        for finding in lint::check(repo) {
            eprintln!("warning: {}: {}", name, finding);
            warnings += 1;
        }
    }

    if args.strict && warnings > 0 {
        bail!("{} warning(s) found in strict mode", warnings);
    }
    println!(
        "configuration is valid: {} repositories, {} warning(s)",
        computed.len(),
        warnings
    );
    Ok(())
}
