//! Per-chain atom tables read from GPCRDB-indexed structure files.
//!
//! Each residue is keyed by the generic number decoded from its CA B-factor, or by its raw
//! sequence number when the B-factor is an ordinary temperature factor. Template alignment
//! and homology modeling look residues up by generic number through this table.

use super::bfactor::decode_generic_number;
use super::context::IoContext;
use super::error::Error;
use super::pdb::reader;
use crate::model::{
    chain::Chain, generic::GenericNumber, residue::Residue, structure::Structure,
    types::ResidueCategory,
};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

pub const BACKBONE_ATOMS: [&str; 4] = ["N", "CA", "C", "O"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKey {
    Generic(GenericNumber),
    Sequence(i32),
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKey::Generic(gn) => write!(f, "{}", gn.dotted()),
            TableKey::Sequence(seq) => write!(f, "{}", seq),
        }
    }
}

/// Why a backbone truncation could not be applied completely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackboneIssue {
    MissingResidue,
    MissingAtoms(Vec<&'static str>),
}

#[derive(Debug, Clone)]
pub struct GpcrdbAtomTable {
    chain_id: String,
    entries: Vec<(TableKey, Residue)>,
    index: HashMap<TableKey, usize>,
}

/// Location of the GPCRDB-indexed file for a structure chain: `<dir>/<PDB>_<chain>_GPCRDB.pdb`.
pub fn table_path(dir: &Path, pdb_code: &str, chain_id: char) -> PathBuf {
    dir.join(format!("{}_{}_GPCRDB.pdb", pdb_code, chain_id))
}

impl GpcrdbAtomTable {
    /// Builds the table from a chain; residues without a CA atom are skipped.
    ///
    /// Later residues that decode to an already used key replace the earlier entry in place.
    pub fn from_chain(chain: &Chain) -> Self {
        let mut table = Self {
            chain_id: chain.id.clone(),
            entries: Vec::new(),
            index: HashMap::new(),
        };
        table.extend_from_chain(chain);
        table
    }

    /// Builds the table from every chain of a GPCRDB file, which holds a single receptor chain.
    pub fn from_structure(structure: &Structure) -> Self {
        let mut chains = structure.iter_chains();
        let Some(first) = chains.next() else {
            return Self {
                chain_id: String::new(),
                entries: Vec::new(),
                index: HashMap::new(),
            };
        };

        let mut table = Self::from_chain(first);
        for chain in chains {
            table.extend_from_chain(chain);
        }
        table
    }

    /// Parses a GPCRDB-indexed PDB stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unindexed`] when no residue is keyed by a generic number, which is
    /// the case for plain PDB files mistaken for templates.
    pub fn read<R: BufRead>(reader: R, context: &IoContext) -> Result<Self, Error> {
        let structure = reader::read(reader, context)?;
        let table = Self::from_structure(&structure);
        if !table.iter().any(|(key, _)| matches!(key, TableKey::Generic(_))) {
            return Err(Error::Unindexed { path: None });
        }
        Ok(table)
    }

    pub fn open(path: &Path, context: &IoContext) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| Error::from_io(e, Some(path.to_path_buf())))?;
        Self::read(BufReader::new(file), context).map_err(|e| e.with_path(path))
    }

    fn extend_from_chain(&mut self, chain: &Chain) {
        for residue in chain.iter_residues() {
            let Some(ca) = residue.atom("CA") else {
                if residue.category == ResidueCategory::Standard {
                    log::warn!(
                        "Unable to parse residue {} in chain {}: no CA atom",
                        residue.id,
                        chain.id
                    );
                }
                continue;
            };

            let key = decode_generic_number(ca.b_factor)
                .map(TableKey::Generic)
                .unwrap_or(TableKey::Sequence(residue.id));
            self.insert(key, residue.clone());
        }
    }

    fn insert(&mut self, key: TableKey, residue: Residue) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 = residue,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push((key, residue));
            }
        }
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, gn: &GenericNumber) -> Option<&Residue> {
        self.get_by_key(&TableKey::Generic(*gn))
    }

    pub fn get_by_key(&self, key: &TableKey) -> Option<&Residue> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    pub fn contains(&self, gn: &GenericNumber) -> bool {
        self.index.contains_key(&TableKey::Generic(*gn))
    }

    /// Fetches every residue of a generic-number window, or nothing if any is absent.
    pub fn fetch_window(&self, window: &[GenericNumber]) -> Option<Vec<&Residue>> {
        window.iter().map(|gn| self.get(gn)).collect()
    }

    /// Reduces the residue at `gn` to its backbone atoms.
    pub fn truncate_to_backbone(&mut self, gn: &GenericNumber) -> Result<(), BackboneIssue> {
        let slot = *self
            .index
            .get(&TableKey::Generic(*gn))
            .ok_or(BackboneIssue::MissingResidue)?;
        let residue = &mut self.entries[slot].1;

        let missing: Vec<&'static str> = BACKBONE_ATOMS
            .iter()
            .copied()
            .filter(|name| !residue.has_atom(name))
            .collect();
        residue.retain_atoms(&BACKBONE_ATOMS);

        if missing.is_empty() {
            Ok(())
        } else {
            Err(BackboneIssue::MissingAtoms(missing))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TableKey, &Residue)> {
        self.entries.iter().map(|(key, residue)| (key, residue))
    }

    /// Rebuilds a single-chain structure from the table in table order.
    pub fn to_structure(&self) -> Structure {
        let mut chain = Chain::new(&self.chain_id);
        for (_, residue) in &self.entries {
            if chain.residue_by_key(&residue.key()).is_none() {
                chain.add_residue(residue.clone());
            }
        }
        let mut structure = Structure::new();
        structure.add_chain(chain);
        structure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::types::{Element, Point, StandardResidue};

    fn residue(id: i32, standard: StandardResidue, b_factor: f64, with_side_chain: bool) -> Residue {
        let mut residue = Residue::new(
            id,
            None,
            standard.name(),
            Some(standard),
            ResidueCategory::Standard,
        );
        for name in BACKBONE_ATOMS {
            let element = if name == "N" {
                Element::N
            } else if name == "O" {
                Element::O
            } else {
                Element::C
            };
            residue.add_atom(
                Atom::new(name, element, Point::new(id as f64, 0.0, 0.0)).with_b_factor(b_factor),
            );
        }
        if with_side_chain {
            residue.add_atom(Atom::new("CB", Element::C, Point::origin()).with_b_factor(b_factor));
        }
        residue
    }

    fn chain() -> Chain {
        let mut chain = Chain::new("A");
        chain.add_residue(residue(80, StandardResidue::LEU, 2.40, true));
        chain.add_residue(residue(81, StandardResidue::ALA, 2.41, true));
        chain.add_residue(residue(82, StandardResidue::VAL, -2.41, true));
        chain.add_residue(residue(83, StandardResidue::SER, 35.0, true));
        chain
    }

    fn gn(label: &str) -> GenericNumber {
        label.parse().unwrap()
    }

    #[test]
    fn from_chain_keys_by_generic_number_or_sequence() {
        let table = GpcrdbAtomTable::from_chain(&chain());

        assert_eq!(table.len(), 4);
        assert_eq!(table.get(&gn("2x41")).unwrap().id, 81);
        assert_eq!(table.get(&gn("2x411")).unwrap().id, 82);
        assert_eq!(
            table.get_by_key(&TableKey::Sequence(83)).unwrap().name,
            "SER"
        );
    }

    #[test]
    fn from_chain_skips_residues_without_ca() {
        let mut chain = chain();
        chain.add_residue(Residue::new(900, None, "HOH", None, ResidueCategory::Hetero));
        let table = GpcrdbAtomTable::from_chain(&chain);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn fetch_window_is_all_or_nothing() {
        let table = GpcrdbAtomTable::from_chain(&chain());

        let window = table.fetch_window(&[gn("2x40"), gn("2x41")]).unwrap();
        assert_eq!(window.iter().map(|r| r.id).collect::<Vec<_>>(), vec![80, 81]);
        assert!(table.fetch_window(&[gn("2x40"), gn("2x42")]).is_none());
    }

    #[test]
    fn truncate_to_backbone_drops_side_chain() {
        let mut table = GpcrdbAtomTable::from_chain(&chain());

        assert_eq!(table.truncate_to_backbone(&gn("2x41")), Ok(()));
        let names: Vec<&str> = table
            .get(&gn("2x41"))
            .unwrap()
            .iter_atoms()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, BACKBONE_ATOMS.to_vec());
        assert_eq!(
            table.truncate_to_backbone(&gn("3x50")),
            Err(BackboneIssue::MissingResidue)
        );
    }

    #[test]
    fn truncate_to_backbone_reports_missing_atoms() {
        let mut chain = Chain::new("A");
        let mut partial = Residue::new(
            10,
            None,
            "ALA",
            Some(StandardResidue::ALA),
            ResidueCategory::Standard,
        );
        partial.add_atom(Atom::new("CA", Element::C, Point::origin()).with_b_factor(3.5));
        partial.add_atom(Atom::new("CB", Element::C, Point::origin()).with_b_factor(3.5));
        chain.add_residue(partial);

        let mut table = GpcrdbAtomTable::from_chain(&chain);
        assert_eq!(
            table.truncate_to_backbone(&gn("3x50")),
            Err(BackboneIssue::MissingAtoms(vec!["N", "C", "O"]))
        );
        assert_eq!(table.get(&gn("3x50")).unwrap().atom_count(), 1);
    }

    #[test]
    fn from_structure_merges_all_chains() {
        let mut structure = Structure::new();
        structure.add_chain(chain());
        let mut extra = Chain::new("B");
        extra.add_residue(residue(120, StandardResidue::TRP, 3.5, true));
        structure.add_chain(extra);

        let table = GpcrdbAtomTable::from_structure(&structure);
        assert_eq!(table.chain_id(), "A");
        assert_eq!(table.len(), 5);
        assert_eq!(table.get(&gn("3x50")).unwrap().id, 120);
        assert!(GpcrdbAtomTable::from_structure(&Structure::new()).is_empty());
    }

    #[test]
    fn read_parses_written_table() {
        let mut structure = Structure::new();
        structure.add_chain(chain());
        let mut buffer = Vec::new();
        crate::io::pdb::writer::write_structure(&mut buffer, &structure).unwrap();

        let table =
            GpcrdbAtomTable::read(std::io::Cursor::new(buffer), &IoContext::default()).unwrap();
        assert_eq!(table.get(&gn("2x411")).unwrap().name, "VAL");
    }

    #[test]
    fn read_rejects_file_without_generic_numbers() {
        let mut chain = Chain::new("A");
        chain.add_residue(residue(80, StandardResidue::LEU, 35.0, false));
        let mut structure = Structure::new();
        structure.add_chain(chain);
        let mut buffer = Vec::new();
        crate::io::pdb::writer::write_structure(&mut buffer, &structure).unwrap();

        let result = GpcrdbAtomTable::read(std::io::Cursor::new(buffer), &IoContext::default());
        assert!(matches!(result, Err(Error::Unindexed { path: None })));
    }

    #[test]
    fn table_path_follows_gpcrdb_naming() {
        let path = table_path(Path::new("structure/PDB"), "4DKL", 'A');
        assert_eq!(path, PathBuf::from("structure/PDB/4DKL_A_GPCRDB.pdb"));
    }
}
