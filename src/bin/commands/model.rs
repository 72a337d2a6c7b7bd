use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use log::{info, warn};

use gpcr_forge::db::Catalog;
use gpcr_forge::homology::{HomologyConfig, HomologyModeler};

use crate::commands::{StateArg, run_with_spinner, write_json};

/// Aligns a receptor with its best template and writes the PIR alignment.
#[derive(Debug, Args)]
pub struct ModelArgs {
    /// Entry name of the receptor to model (e.g. `adrb2_human`).
    #[arg(value_name = "ENTRY")]
    pub entry: String,
    /// Conformation state of the model.
    #[arg(long, value_enum, default_value_t = StateArg::Inactive)]
    pub state: StateArg,
    /// States a main template may be in. Defaults to `--state`.
    #[arg(long = "template-state", value_enum, value_name = "STATE")]
    pub template_states: Vec<StateArg>,
    /// States whose structures may donate bulge and constriction sites.
    #[arg(
        long = "anomaly-state",
        value_enum,
        value_name = "STATE",
        default_values_t = [StateArg::Inactive, StateArg::Active]
    )]
    pub anomaly_states: Vec<StateArg>,
    /// Directory of GPCRDB-indexed template files.
    #[arg(long, value_name = "DIR", default_value = "structure/PDB")]
    pub pdb_dir: PathBuf,
    /// Directory the PIR alignment is written to.
    #[arg(long, value_name = "DIR", default_value = "structure/PIR")]
    pub pir_dir: PathBuf,
    /// Segments to align, in order.
    #[arg(long = "segment", value_name = "NAME")]
    pub segments: Vec<String>,
    /// Leave bulges unresolved.
    #[arg(long)]
    pub no_bulges: bool,
    /// Leave constrictions unresolved.
    #[arg(long)]
    pub no_constrictions: bool,
    /// Statistics JSON file. When omitted, stdout is used.
    #[arg(long, value_name = "FILE")]
    pub stats: Option<PathBuf>,
    /// Also write the main-template atoms, as used by the model, to this PDB file.
    #[arg(long, value_name = "FILE")]
    pub template_out: Option<PathBuf>,
}

pub fn run(catalog: &Catalog, args: &ModelArgs) -> Result<()> {
    let mut config = HomologyConfig {
        pdb_dir: args.pdb_dir.clone(),
        pir_dir: args.pir_dir.clone(),
        switch_bulges: !args.no_bulges,
        switch_constrictions: !args.no_constrictions,
        anomaly_states: args.anomaly_states.iter().map(|&s| s.into()).collect(),
        ..HomologyConfig::default()
    };
    if !args.segments.is_empty() {
        config.segments = args.segments.clone();
    }

    let modeler = HomologyModeler::new(
        catalog,
        &args.entry,
        args.state.into(),
        args.template_states.iter().map(|&s| s.into()).collect(),
        config,
    )?;

    let model = run_with_spinner(&format!("Aligning {}", args.entry), || {
        modeler
            .run()
            .with_context(|| format!("Failed to build alignment for {}", args.entry))
    })?;

    for warning in &model.statistics.warnings {
        warn!("{}", warning);
    }

    let pir = model
        .write_pir(&modeler.config().pir_dir)
        .context("Failed to write PIR file")?;
    info!("PIR alignment: {}", pir.display());

    if let Some(path) = &args.template_out {
        model
            .write_template(path)
            .with_context(|| format!("Failed to write template {}", path.display()))?;
        info!("Template atoms: {}", path.display());
    }

    write_json(&model.statistics, args.stats.as_deref())
}
