//! Read-only catalog of receptors, their generic-numbered residues, and solved structures.
//!
//! The catalog is the data source both pipelines query: Pipeline A asks for reference
//! structures and per-protein generic-number rosters, Pipeline B for template structures by
//! conformation state and for the proteins that carry a residue at a given generic number.

use crate::io::Error;
use crate::model::generic::GenericNumber;
use crate::model::types::ConformationState;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct ProteinResidue {
    pub sequence_number: i32,
    pub amino_acid: char,
    pub generic_number: Option<GenericNumber>,
    pub segment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Protein {
    pub entry_name: String,
    pub accession: String,
    pub family: String,
    pub sequence: String,
    residues: Vec<ProteinResidue>,
    generic_index: HashMap<GenericNumber, usize>,
}

impl Protein {
    pub fn new(
        entry_name: impl Into<String>,
        accession: impl Into<String>,
        family: impl Into<String>,
        sequence: impl Into<String>,
        residues: Vec<ProteinResidue>,
    ) -> Self {
        let generic_index = residues
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.generic_number.map(|gn| (gn, i)))
            .collect();
        let mut sequence = sequence.into();
        if sequence.is_empty() {
            sequence = residues.iter().map(|r| r.amino_acid).collect();
        }
        Self {
            entry_name: entry_name.into(),
            accession: accession.into(),
            family: family.into(),
            sequence,
            residues,
            generic_index,
        }
    }

    pub fn residues(&self) -> &[ProteinResidue] {
        &self.residues
    }

    pub fn residue_at(&self, gn: &GenericNumber) -> Option<&ProteinResidue> {
        self.generic_index.get(gn).map(|&i| &self.residues[i])
    }

    /// Residues assigned to a segment, in sequence order.
    pub fn segment_residues<'a>(
        &'a self,
        segment: &'a str,
    ) -> impl Iterator<Item = &'a ProteinResidue> + 'a {
        self.residues
            .iter()
            .filter(move |r| r.segment.as_deref() == Some(segment))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureEntry {
    pub pdb_code: String,
    pub protein: String,
    pub preferred_chain: String,
    pub state: ConformationState,
    pub resolution: f64,
    pub pdb_file: PathBuf,
    pub refined: bool,
}

impl StructureEntry {
    /// First chain listed in the comma-separated preferred-chain field.
    pub fn primary_chain(&self) -> &str {
        self.preferred_chain
            .split(',')
            .next()
            .map(str::trim)
            .unwrap_or_default()
    }

    /// Single-letter chain used to name GPCRDB-indexed template files.
    pub fn template_chain(&self) -> char {
        self.preferred_chain.chars().next().unwrap_or('A')
    }
}

/// Generic-number map of one structure's receptor, grouped by segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenericNumberMap {
    pub pdb_code: String,
    pub protein: String,
    pub chain: String,
    pub segments: BTreeMap<String, Vec<i32>>,
    pub generic_numbers: BTreeMap<i32, GenericNumber>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    proteins: Vec<Protein>,
    protein_index: HashMap<String, usize>,
    structures: Vec<StructureEntry>,
}

impl Catalog {
    /// Assembles a catalog, rejecting duplicate proteins and structures of unknown proteins.
    pub fn new(proteins: Vec<Protein>, structures: Vec<StructureEntry>) -> Result<Self, Error> {
        let mut protein_index = HashMap::new();
        for (i, protein) in proteins.iter().enumerate() {
            if protein_index.insert(protein.entry_name.clone(), i).is_some() {
                return Err(Error::inconsistent_data(
                    "catalog",
                    None,
                    format!("duplicate protein entry '{}'", protein.entry_name),
                ));
            }
        }

        if let Some(orphan) = structures
            .iter()
            .find(|s| !protein_index.contains_key(&s.protein))
        {
            return Err(Error::inconsistent_data(
                "catalog",
                None,
                format!(
                    "structure '{}' references unknown protein '{}'",
                    orphan.pdb_code, orphan.protein
                ),
            ));
        }

        Ok(Self {
            proteins,
            protein_index,
            structures,
        })
    }

    pub fn proteins(&self) -> &[Protein] {
        &self.proteins
    }

    pub fn structures(&self) -> &[StructureEntry] {
        &self.structures
    }

    pub fn protein(&self, entry_name: &str) -> Option<&Protein> {
        self.protein_index
            .get(entry_name)
            .map(|&i| &self.proteins[i])
    }

    pub fn structure(&self, pdb_code: &str) -> Option<&StructureEntry> {
        self.structures
            .iter()
            .find(|s| s.pdb_code.eq_ignore_ascii_case(pdb_code))
    }

    pub fn protein_of(&self, structure: &StructureEntry) -> Option<&Protein> {
        self.protein(&structure.protein)
    }

    /// Unrefined structures of proteins whose family slug starts with `family_prefix`.
    pub fn reference_structures(&self, family_prefix: &str) -> Vec<&StructureEntry> {
        self.structures
            .iter()
            .filter(|s| !s.refined)
            .filter(|s| {
                self.protein_of(s)
                    .is_some_and(|p| p.family.starts_with(family_prefix))
            })
            .collect()
    }

    /// Best-resolution structure of each protein having a structure in one of `states`.
    ///
    /// Entries follow catalog protein order.
    pub fn best_structures(&self, states: &[ConformationState]) -> Vec<&StructureEntry> {
        let mut best: HashMap<&str, &StructureEntry> = HashMap::new();
        for structure in self.structures.iter().filter(|s| states.contains(&s.state)) {
            best.entry(structure.protein.as_str())
                .and_modify(|current| {
                    if structure.resolution < current.resolution {
                        *current = structure;
                    }
                })
                .or_insert(structure);
        }

        self.proteins
            .iter()
            .filter_map(|p| best.get(p.entry_name.as_str()).copied())
            .collect()
    }

    /// Entry names of proteins with a residue at `gn`, optionally restricted to one amino acid.
    pub fn proteins_with_generic_number(
        &self,
        gn: &GenericNumber,
        amino_acid: Option<char>,
    ) -> HashSet<&str> {
        self.proteins
            .iter()
            .filter(|p| match p.residue_at(gn) {
                Some(residue) => amino_acid.is_none_or(|aa| residue.amino_acid == aa),
                None => false,
            })
            .map(|p| p.entry_name.as_str())
            .collect()
    }

    /// Generic numbers and per-segment sequence numbers of a structure's receptor.
    pub fn generic_number_map(&self, pdb_code: &str) -> Option<GenericNumberMap> {
        let structure = self.structure(pdb_code)?;
        let protein = self.protein_of(structure)?;

        let mut segments: BTreeMap<String, Vec<i32>> = BTreeMap::new();
        let mut generic_numbers = BTreeMap::new();
        for residue in protein.residues() {
            if let Some(segment) = &residue.segment {
                segments
                    .entry(segment.clone())
                    .or_default()
                    .push(residue.sequence_number);
            }
            if let Some(gn) = residue.generic_number {
                generic_numbers.insert(residue.sequence_number, gn);
            }
        }

        Some(GenericNumberMap {
            pdb_code: structure.pdb_code.clone(),
            protein: protein.entry_name.clone(),
            chain: structure.primary_chain().to_string(),
            segments,
            generic_numbers,
        })
    }
}
