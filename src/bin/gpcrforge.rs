use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{angles, catalog, model, rmsd};

#[derive(Parser, Debug)]
#[command(
    name = "gpcrforge",
    about = "Helix-angle statistics and homology-model template alignment for GPCR structures.",
    version,
    author,
    arg_required_else_help = true
)]
struct Cli {
    /// Structure catalog (TOML) listing proteins, residues, and structures.
    #[arg(short, long, value_name = "FILE", global = true, default_value = "catalog.toml")]
    catalog: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Measure bend, tilt, and exposure of transmembrane residues across reference structures.
    Angles(angles::AnglesArgs),
    /// Align a receptor with its best template and write the PIR alignment.
    Model(model::ModelArgs),
    /// Report the RMSD between two models.
    Rmsd(rmsd::RmsdArgs),
    /// Summarize the catalog.
    Catalog(catalog::CatalogArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Angles(args) => {
            let catalog = commands::open_catalog(&cli.catalog)?;
            angles::run(&catalog, &args)?;
        }
        Command::Model(args) => {
            let catalog = commands::open_catalog(&cli.catalog)?;
            model::run(&catalog, &args)?;
        }
        Command::Rmsd(args) => rmsd::run(&args)?,
        Command::Catalog(args) => {
            let catalog = commands::open_catalog(&cli.catalog)?;
            catalog::run(&catalog, &args)?;
        }
    }

    Ok(())
}
