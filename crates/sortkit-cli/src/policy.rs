use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use sortkit_runtime::ListPolicy;

use crate::error::Result;

#[derive(Debug, Clone, Args)]
pub struct PolicyArgs {
    /// Policy file (TOML or JSON). Defaults apply when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Validate only; print `ok` instead of the policy.
    #[arg(long)]
    pub check: bool,
}

/// Load and validate the effective policy.
pub fn effective_policy(config: Option<&Path>) -> Result<ListPolicy> {
    let policy = match config {
        Some(path) => ListPolicy::from_file(path)?,
        None => ListPolicy::default(),
    };
    Ok(policy.validated()?)
}

pub fn run_policy(args: PolicyArgs, out: &mut dyn Write) -> Result<()> {
    let policy = effective_policy(args.config.as_deref())?;
    if args.check {
        writeln!(out, "ok")?;
    } else {
        write!(out, "{}", policy.to_toml_string()?)?;
    }
    Ok(())
}
