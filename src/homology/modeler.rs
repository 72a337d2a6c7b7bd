//! One homology-model run: template choice, alignment, site repair, and output files.

use super::aligner::MainAlignment;
use super::anomaly::{AnomalyReport, AnomalySwitches, resolve_anomalies};
use super::engine::{Alignment, TRANSMEMBRANE_SEGMENTS};
use super::error::Error;
use super::library::TemplateLibrary;
use super::similarity::SimilarityTable;
use super::statistics::ModelStatistics;
use super::switcher::switch_non_conserved;
use crate::db::{Catalog, Protein};
use crate::io::{self, GpcrdbAtomTable, PirKind, PirRecord, write_pdb_structure, write_pir};
use crate::model::types::ConformationState;
use log::info;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Settings for a homology-model run.
#[derive(Debug, Clone)]
pub struct HomologyConfig {
    /// Directory of GPCRDB-indexed template files.
    pub pdb_dir: PathBuf,
    /// Directory the PIR alignment is written to.
    pub pir_dir: PathBuf,
    /// Segments aligned, in order.
    pub segments: Vec<String>,
    pub switch_bulges: bool,
    pub switch_constrictions: bool,
    /// States whose structures may donate bulge and constriction sites.
    pub anomaly_states: Vec<ConformationState>,
}

impl Default for HomologyConfig {
    fn default() -> Self {
        Self {
            pdb_dir: PathBuf::from("structure/PDB"),
            pir_dir: PathBuf::from("structure/PIR"),
            segments: TRANSMEMBRANE_SEGMENTS.iter().map(|s| s.to_string()).collect(),
            switch_bulges: true,
            switch_constrictions: true,
            anomaly_states: vec![ConformationState::Inactive, ConformationState::Active],
        }
    }
}

/// Builds the reference/template alignment a model of one receptor is made from.
#[derive(Debug, Clone)]
pub struct HomologyModeler<'a> {
    catalog: &'a Catalog,
    reference: &'a Protein,
    state: ConformationState,
    query_states: Vec<ConformationState>,
    config: HomologyConfig,
}

impl<'a> HomologyModeler<'a> {
    /// Prepares a run for `entry_name` in `state`.
    ///
    /// # Arguments
    ///
    /// * `catalog` - Proteins and structures to draw templates from.
    /// * `entry_name` - Receptor to model.
    /// * `state` - Conformation state the model represents.
    /// * `query_states` - States a main template may be in; empty means `state` only.
    /// * `config` - Directories, segments, and anomaly settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownProtein`] if `entry_name` is not cataloged.
    pub fn new(
        catalog: &'a Catalog,
        entry_name: &str,
        state: ConformationState,
        query_states: Vec<ConformationState>,
        config: HomologyConfig,
    ) -> Result<Self, Error> {
        let reference = catalog
            .protein(entry_name)
            .ok_or_else(|| Error::unknown_protein(entry_name))?;
        let query_states = if query_states.is_empty() {
            vec![state]
        } else {
            query_states
        };

        Ok(Self {
            catalog,
            reference,
            state,
            query_states,
            config,
        })
    }

    pub fn reference(&self) -> &Protein {
        self.reference
    }

    pub fn config(&self) -> &HomologyConfig {
        &self.config
    }

    /// Runs template selection, alignment, anomaly handling, and residue switching.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTemplates`] when no structure in the query states is available and
    /// [`Error::MainTemplateUnavailable`] when the chosen template's atom table cannot be read.
    pub fn run(&self) -> Result<HomologyModel, Error> {
        let catalog = self.catalog;
        let reference = self.reference;
        let segments = self.config.segments.as_slice();

        let ranked = SimilarityTable::rank(catalog, reference, &self.query_states, segments);
        let main = ranked.main_template(reference, &self.query_states)?;
        info!(
            "Main template for {}: {} ({}%, chain {})",
            reference.entry_name,
            main.structure.pdb_code,
            main.similarity,
            main.structure.template_chain()
        );

        let mut library = TemplateLibrary::new(&self.config.pdb_dir);
        let template_file = library.path_of(main.structure);
        let mut main_table =
            library
                .load(main.structure)
                .map_err(|source| Error::MainTemplateUnavailable {
                    pdb_code: main.structure.pdb_code.clone(),
                    source,
                })?;

        let pair = Alignment::build(Some(reference), &[main.protein], segments);
        let mut alignment = MainAlignment::from_alignment(
            &pair,
            &main.protein.entry_name,
            main.structure.pdb_code.clone(),
        )
        .ok_or_else(|| Error::NoTemplates {
            entry_name: reference.entry_name.clone(),
            states: self.query_states.clone(),
        })?;

        let anomalies = if self.config.switch_bulges || self.config.switch_constrictions {
            let donors =
                SimilarityTable::rank(catalog, reference, &self.config.anomaly_states, segments);
            resolve_anomalies(
                &mut alignment,
                catalog,
                &donors,
                &mut library,
                AnomalySwitches {
                    bulges: self.config.switch_bulges,
                    constrictions: self.config.switch_constrictions,
                },
            )
        } else {
            AnomalyReport::default()
        };

        let reference_length = alignment.reference_length();
        let conserved = alignment.conserved_count();
        let non_conserved = alignment.non_conserved_count();

        let switches =
            switch_non_conserved(&mut alignment, catalog, &ranked, &mut library, &mut main_table);
        info!(
            "{}: {} of {} non-conserved residues switched, {} truncated to backbone",
            reference.entry_name,
            switches.switched.len(),
            non_conserved,
            switches.truncated.len()
        );

        let statistics = ModelStatistics {
            reference: reference.entry_name.clone(),
            uniprot_id: reference.accession.clone(),
            state: self.state,
            main_template: main.structure.pdb_code.clone(),
            preferred_chain: main.structure.template_chain(),
            main_template_similarity: main.similarity,
            reference_length,
            conserved,
            non_conserved,
            switched: switches.switched.len(),
            anomalies,
            non_conserved_templates: switches.switched,
            warnings: alignment.warnings().to_vec(),
        };

        Ok(HomologyModel {
            alignment,
            statistics,
            main_table,
            template_file,
        })
    }
}

/// Result of a [`HomologyModeler`] run.
#[derive(Debug, Clone)]
pub struct HomologyModel {
    pub alignment: MainAlignment,
    pub statistics: ModelStatistics,
    /// Main-template atoms, with unswitched non-conserved residues cut to the backbone.
    pub main_table: GpcrdbAtomTable,
    pub template_file: PathBuf,
}

impl HomologyModel {
    /// Template record first, reference second; out-of-range markers become gaps.
    pub fn pir_records(&self) -> [PirRecord; 2] {
        let template_id = self.template_file.display().to_string();
        let template = self.alignment.template_string().replace('x', "-");
        let reference = self.alignment.reference_string();
        [
            PirRecord::new(template_id, PirKind::Structure, template),
            PirRecord::new(
                self.statistics.uniprot_id.clone(),
                PirKind::Sequence,
                reference,
            ),
        ]
    }

    /// `<dir>/<accession>_<state>.pir`
    pub fn pir_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!(
            "{}_{}.pir",
            self.statistics.uniprot_id, self.statistics.state
        ))
    }

    /// Writes the PIR alignment under `dir`, creating it if needed.
    pub fn write_pir(&self, dir: &Path) -> Result<PathBuf, Error> {
        fs::create_dir_all(dir).map_err(|e| io::Error::from_io(e, Some(dir.to_path_buf())))?;
        let path = self.pir_path(dir);
        let file = File::create(&path).map_err(|e| io::Error::from_io(e, Some(path.clone())))?;
        write_pir(BufWriter::new(file), &self.pir_records()).map_err(|e| e.with_path(&path))?;
        info!("Wrote alignment to {}", path.display());
        Ok(path)
    }

    /// Writes the main-template atoms as a PDB file.
    pub fn write_template(&self, path: &Path) -> Result<(), Error> {
        let file = File::create(path).map_err(|e| io::Error::from_io(e, Some(path.to_path_buf())))?;
        write_pdb_structure(BufWriter::new(file), &self.main_table.to_structure())
            .map_err(|e| e.with_path(path))?;
        Ok(())
    }
}
