use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use log::info;

use gpcr_forge::db::Catalog;
use gpcr_forge::ops::{AngleConfig, AngleKind, compute_helix_angles};

use crate::commands::{run_with_spinner, write_json};

/// Angle that feeds medians and significance scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AngleArg {
    #[default]
    #[value(name = "bend")]
    Bend,
    #[value(name = "tilt")]
    Tilt,
}

impl From<AngleArg> for AngleKind {
    fn from(value: AngleArg) -> Self {
        match value {
            AngleArg::Bend => AngleKind::Bend,
            AngleArg::Tilt => AngleKind::Tilt,
        }
    }
}

/// Measures helix angles and exposure across the reference structures.
#[derive(Debug, Args)]
pub struct AnglesArgs {
    /// Output JSON file. When omitted, stdout is used.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Directory holding `<PDB>angle_colored_axes.pdb` files for surface area.
    #[arg(long, value_name = "DIR", default_value = "pymol_output")]
    pub sasa_dir: PathBuf,
    /// Family slug prefix selecting the reference structures.
    #[arg(long, default_value = "001")]
    pub family_prefix: String,
    /// Fit the bundle axis through whole helices instead of their extracellular halves.
    #[arg(long)]
    pub full_helix_axis: bool,
    /// Solvent probe radius in Å.
    #[arg(long, default_value_t = 1.4)]
    pub probe_radius: f64,
    /// Sample points per atom sphere for surface area.
    #[arg(long, default_value_t = 960)]
    pub sphere_points: usize,
    /// Neighbour radius in Å for half-sphere exposure.
    #[arg(long, default_value_t = 12.0)]
    pub hse_radius: f64,
    /// Angle scored against the per-state population.
    #[arg(long, value_enum, default_value_t = AngleArg::Bend)]
    pub significance: AngleArg,
    /// Only emit records of this structure.
    #[arg(long, value_name = "PDB")]
    pub structure: Option<String>,
}

pub fn run(catalog: &Catalog, args: &AnglesArgs) -> Result<()> {
    let config = AngleConfig {
        extracellular_axis: !args.full_helix_axis,
        sasa_dir: args.sasa_dir.clone(),
        probe_radius: args.probe_radius,
        sphere_points: args.sphere_points,
        hse_radius: args.hse_radius,
        family_prefix: args.family_prefix.clone(),
        significance_source: args.significance.into(),
    };

    let batch = run_with_spinner("Measuring helix angles", || {
        Ok(compute_helix_angles(catalog, &config))
    })?;
    info!(
        "{} records from {} structures, {} failed",
        batch.records.len(),
        batch.structure_count(),
        batch.failed.len()
    );

    match &args.structure {
        Some(pdb_code) => write_json(&batch.for_structure(pdb_code), args.output.as_deref()),
        None => write_json(&batch, args.output.as_deref()),
    }
}
