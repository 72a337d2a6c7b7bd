use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use gpcr_forge::homology::validation::pdb_rmsd;

/// Compares two models of the same receptor atom by atom.
#[derive(Debug, Args)]
pub struct RmsdArgs {
    #[arg(value_name = "FIRST")]
    pub first: PathBuf,
    #[arg(value_name = "SECOND")]
    pub second: PathBuf,
}

pub fn run(args: &RmsdArgs) -> Result<()> {
    let value = pdb_rmsd(&args.first, &args.second).with_context(|| {
        format!(
            "Failed to compare {} with {}",
            args.first.display(),
            args.second.display()
        )
    })?;
    println!("{:.3}", value);
    Ok(())
}
