//! Helix-angle measurements over the reference structure set.
//!
//! Every reference structure is filtered to its transmembrane residues, fitted with helix and
//! bundle axes, and measured for bend, tilt, surface area, and half-sphere exposure. Structures
//! are independent: a failure is logged and recorded, and the batch moves on. Once all
//! structures are measured, each value is compared with the other structures in the same
//! state at the same generic number.

use super::angle::{bend_angles, round3, tilt_angles};
use super::axis::{build_axes, helix_traces};
use super::error::Error;
use super::exposure::{
    DEFAULT_HSE_RADIUS, DEFAULT_PROBE_RADIUS, DEFAULT_SPHERE_POINTS, half_sphere_exposure,
    residue_sasa,
};
use super::filter::{Roster, filter_structure};
use super::significance::{median, significance};
use crate::db::{Catalog, Protein, StructureEntry};
use crate::io::{IoContext, read_pdb_file};
use crate::model::generic::GenericNumber;
use crate::model::types::ConformationState;
use crate::utils::parallel::*;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Which measured angle feeds the per-state medians and significance scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleKind {
    /// Axis→CA→CB.
    #[default]
    Bend,
    /// Axis→axis→CA.
    Tilt,
}

/// Settings for a helix-angle run.
#[derive(Debug, Clone)]
pub struct AngleConfig {
    /// Fit the bundle axis through extracellular half-axes instead of all helix points.
    pub extracellular_axis: bool,
    /// Directory holding the `<code>angle_colored_axes.pdb` files measured for surface area.
    pub sasa_dir: PathBuf,
    pub probe_radius: f64,
    pub sphere_points: usize,
    pub hse_radius: f64,
    /// Family slug prefix selecting the reference structures.
    pub family_prefix: String,
    pub significance_source: AngleKind,
}

impl Default for AngleConfig {
    fn default() -> Self {
        Self {
            extracellular_axis: true,
            sasa_dir: PathBuf::from("pymol_output"),
            probe_radius: DEFAULT_PROBE_RADIUS,
            sphere_points: DEFAULT_SPHERE_POINTS,
            hse_radius: DEFAULT_HSE_RADIUS,
            family_prefix: "001".to_string(),
            significance_source: AngleKind::Bend,
        }
    }
}

/// Angles and exposure of one residue in one structure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AngleRecord {
    pub generic_number: GenericNumber,
    pub sequence_number: i32,
    pub amino_acid: char,
    pub pdb_code: String,
    pub state: ConformationState,
    pub state_index: usize,
    /// Axis→axis→CA angle in degrees.
    pub tilt: f64,
    /// Axis→CA→CB angle in degrees.
    pub bend: f64,
    pub sasa: f64,
    pub hse: u32,
    /// Distance from the state median at this generic number.
    pub diff_median: f64,
    pub significance: f64,
}

impl AngleRecord {
    pub fn value(&self, kind: AngleKind) -> f64 {
        match kind {
            AngleKind::Bend => self.bend,
            AngleKind::Tilt => self.tilt,
        }
    }
}

/// A reference structure that could not be measured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedStructure {
    pub pdb_code: String,
    pub reason: String,
}

/// Output of a helix-angle run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AngleBatch {
    pub records: Vec<AngleRecord>,
    pub failed: Vec<FailedStructure>,
}

impl AngleBatch {
    /// Records of one structure in chain order (case-insensitive code match).
    pub fn for_structure(&self, pdb_code: &str) -> Vec<&AngleRecord> {
        self.records
            .iter()
            .filter(|r| r.pdb_code.eq_ignore_ascii_case(pdb_code))
            .collect()
    }

    pub fn structure_count(&self) -> usize {
        let mut codes: Vec<&str> = self.records.iter().map(|r| r.pdb_code.as_str()).collect();
        codes.sort_unstable();
        codes.dedup();
        codes.len()
    }
}

/// Path of the surface-area input for a structure.
pub fn sasa_path(dir: &Path, pdb_code: &str) -> PathBuf {
    dir.join(format!("{pdb_code}angle_colored_axes.pdb"))
}

/// Measures every reference structure of `catalog` and scores the results.
///
/// # Arguments
///
/// * `catalog` - Source of reference structures and their generic-numbered residues.
/// * `config` - Axis mode, exposure parameters, and the angle used for scoring.
///
/// # Returns
///
/// All residue records, with medians and significance filled in, plus the structures that
/// failed and why.
pub fn compute_helix_angles(catalog: &Catalog, config: &AngleConfig) -> AngleBatch {
    let context = IoContext::default();
    let structures = catalog.reference_structures(&config.family_prefix);
    info!(
        "Measuring helix angles for {} reference structures (family prefix '{}')",
        structures.len(),
        config.family_prefix
    );

    let outcomes: Vec<(&StructureEntry, Result<Vec<AngleRecord>, Error>)> = structures
        .par_iter()
        .map(|entry| {
            let result = catalog
                .protein_of(entry)
                .ok_or_else(|| Error::MissingProtein {
                    pdb_code: entry.pdb_code.clone(),
                    entry_name: entry.protein.clone(),
                })
                .and_then(|protein| measure_structure(entry, protein, config, &context));
            (*entry, result)
        })
        .collect();

    let mut batch = AngleBatch::default();
    for (entry, outcome) in outcomes {
        match outcome {
            Ok(records) => batch.records.extend(records),
            Err(e) => {
                error!("Failed to measure {}: {}", entry.pdb_code, e);
                batch.failed.push(FailedStructure {
                    pdb_code: entry.pdb_code.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    score_records(&mut batch.records, config.significance_source);
    info!(
        "Measured {} residues across {} structures, {} failed",
        batch.records.len(),
        batch.structure_count(),
        batch.failed.len()
    );
    batch
}

/// Measures one structure; medians and significance are left at zero.
///
/// # Errors
///
/// Any failure to read, filter, fit, or measure the structure, including a non-finite
/// surface-area series.
pub fn measure_structure(
    entry: &StructureEntry,
    protein: &Protein,
    config: &AngleConfig,
    context: &IoContext,
) -> Result<Vec<AngleRecord>, Error> {
    let pdb_code = entry.pdb_code.as_str();
    let chain_id = entry.primary_chain();

    let mut structure = read_pdb_file(&entry.pdb_file, context)?;
    let selection = filter_structure(
        &mut structure,
        pdb_code,
        chain_id,
        Roster::from_protein(protein),
    )?;
    let chain = structure
        .chain(chain_id)
        .ok_or_else(|| Error::missing_chain(pdb_code, chain_id))?;

    let traces = helix_traces(chain, &selection)?;
    let axes = build_axes(&traces, config.extracellular_axis)?;

    let mut bend = Vec::with_capacity(selection.residue_count());
    let mut tilt = Vec::with_capacity(selection.residue_count());
    for (trace, helix_axes) in traces.iter().zip(&axes.helix_axes) {
        bend.extend(bend_angles(&trace.ca, &trace.cb, &axes.global)?);
        tilt.extend(tilt_angles(&trace.ca, helix_axes, &axes.global)?);
    }

    let sasa_structure = read_pdb_file(&sasa_path(&config.sasa_dir, pdb_code), context)?;
    let sasa = residue_sasa(&sasa_structure, config.probe_radius, config.sphere_points);

    let exposure = half_sphere_exposure(chain, config.hse_radius);
    let computed = exposure.iter().filter(|e| e.is_some()).count();

    let residue_count = chain.residue_count();
    if computed != residue_count {
        warn!(
            "Half-sphere exposure length mismatch for {}: {} values for {} residues",
            pdb_code, computed, residue_count
        );
    }
    if sasa.len() != residue_count {
        warn!(
            "Surface area length mismatch for {}: {} values for {} residues",
            pdb_code,
            sasa.len(),
            residue_count
        );
    }
    if !sasa.iter().sum::<f64>().is_finite() {
        return Err(Error::NonFiniteExposure {
            pdb_code: pdb_code.to_string(),
            series: "SASA",
        });
    }

    let records = chain
        .iter_residues()
        .zip(tilt)
        .zip(bend)
        .zip(sasa)
        .zip(exposure)
        .filter_map(|((((residue, tilt), bend), sasa), hse)| {
            let roster_entry = selection.entry(residue.id)?;
            Some(AngleRecord {
                generic_number: roster_entry.generic_number,
                sequence_number: residue.id,
                amino_acid: roster_entry.amino_acid,
                pdb_code: pdb_code.to_string(),
                state: entry.state,
                state_index: entry.state.index(),
                tilt,
                bend,
                sasa: round3(sasa),
                hse: hse.map(|h| h.up).unwrap_or(0),
                diff_median: 0.0,
                significance: 0.0,
            })
        })
        .collect();

    Ok(records)
}

/// Fills `diff_median` and `significance` of every record.
///
/// Populations are the values of `kind` grouped by state and generic number across all
/// records.
pub fn score_records(records: &mut [AngleRecord], kind: AngleKind) {
    let mut populations: HashMap<(ConformationState, GenericNumber), Vec<f64>> = HashMap::new();
    for record in records.iter() {
        populations
            .entry((record.state, record.generic_number))
            .or_default()
            .push(record.value(kind));
    }

    let medians: HashMap<(ConformationState, GenericNumber), f64> = populations
        .iter()
        .filter_map(|(key, values)| median(values).map(|m| (*key, m)))
        .collect();

    for record in records.iter_mut() {
        let key = (record.state, record.generic_number);
        let value = record.value(kind);
        if let (Some(m), Some(population)) = (medians.get(&key), populations.get(&key)) {
            record.diff_median = round3((m - value).abs());
            record.significance = round3(significance(value, population));
        }
    }
}
