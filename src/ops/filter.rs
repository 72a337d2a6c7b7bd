//! Reduces a parsed structure to the transmembrane residues the angle pipeline measures.
//!
//! The catalog supplies a roster of generic-numbered residues for a receptor. The roster is
//! consumed helix by helix, checked against the preferred chain, and the structure is pruned
//! in place so only that chain and the surviving residues remain.

use super::error::Error;
use crate::db::Protein;
use crate::model::generic::GenericNumber;
use crate::model::structure::Structure;
use std::collections::HashSet;

/// Number of transmembrane helices in the receptor bundle.
pub const HELIX_COUNT: usize = 7;

/// Sequence numbers at or above this value belong to engineered fusion partners.
pub const MAX_SEQUENCE_NUMBER: i32 = 1000;

/// A generic-numbered residue of the receptor sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RosterEntry {
    pub sequence_number: i32,
    pub generic_number: GenericNumber,
    pub amino_acid: char,
}

/// Transmembrane residues of one receptor, stored so each helix can be popped off the tail.
///
/// Entries are sorted descending by `(helix, sequence number)`. Draining helix 1 therefore
/// yields its residues in ascending sequence order, then helix 2, and so on. A roster is
/// meant to be drained exactly once.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    /// Collects the residues of `protein` labelled on helices 1–7.
    pub fn from_protein(protein: &Protein) -> Self {
        Self::from_entries(protein.residues().iter().filter_map(|r| {
            r.generic_number
                .filter(GenericNumber::is_transmembrane)
                .map(|gn| RosterEntry {
                    sequence_number: r.sequence_number,
                    generic_number: gn,
                    amino_acid: r.amino_acid,
                })
        }))
    }

    pub fn from_entries(entries: impl IntoIterator<Item = RosterEntry>) -> Self {
        let mut entries: Vec<RosterEntry> = entries.into_iter().collect();
        entries.sort_by(|a, b| {
            (b.generic_number.helix(), b.sequence_number)
                .cmp(&(a.generic_number.helix(), a.sequence_number))
        });
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pops every trailing entry that belongs to `helix`.
    ///
    /// Stops at the first entry of another helix, so helices must be drained in ascending
    /// order for every entry to be seen.
    pub fn drain_helix(&mut self, helix: u8) -> Vec<RosterEntry> {
        let mut drained = Vec::new();
        while let Some(entry) = self.entries.last() {
            if entry.generic_number.helix() != helix {
                break;
            }
            drained.extend(self.entries.pop());
        }
        drained
    }
}

/// Residues retained for each of the seven helices, in ascending sequence order.
#[derive(Debug, Clone, Default)]
pub struct HelixSelection {
    helices: [Vec<RosterEntry>; HELIX_COUNT],
}

impl HelixSelection {
    pub fn helix(&self, index: usize) -> &[RosterEntry] {
        &self.helices[index]
    }

    pub fn helices(&self) -> &[Vec<RosterEntry>; HELIX_COUNT] {
        &self.helices
    }

    pub fn residue_count(&self) -> usize {
        self.helices.iter().map(Vec::len).sum()
    }

    /// Looks up the roster entry of a retained sequence number.
    pub fn entry(&self, sequence_number: i32) -> Option<&RosterEntry> {
        self.helices
            .iter()
            .flatten()
            .find(|e| e.sequence_number == sequence_number)
    }
}

/// Restricts `structure` to the preferred chain and the roster residues present in it.
///
/// The roster is consumed. Entries survive when their sequence number is below
/// [`MAX_SEQUENCE_NUMBER`] and a polymer residue without insertion code carries that number in
/// the chain. All other chains and residues are removed from the structure.
///
/// # Arguments
///
/// * `structure` - Parsed structure, pruned in place.
/// * `pdb_code` - Identifier used in error messages.
/// * `chain_id` - Preferred chain to keep.
/// * `roster` - Transmembrane roster of the structure's receptor.
///
/// # Returns
///
/// The per-helix selection that survived filtering.
///
/// # Errors
///
/// Returns [`Error::MissingChain`] when the preferred chain is absent.
pub fn filter_structure(
    structure: &mut Structure,
    pdb_code: &str,
    chain_id: &str,
    mut roster: Roster,
) -> Result<HelixSelection, Error> {
    structure.retain_chains(|c| c.id == chain_id);
    let chain = structure
        .chain_mut(chain_id)
        .ok_or_else(|| Error::missing_chain(pdb_code, chain_id))?;

    let mut selection = HelixSelection::default();
    for (index, helix) in selection.helices.iter_mut().enumerate() {
        *helix = roster
            .drain_helix(index as u8 + 1)
            .into_iter()
            .filter(|e| {
                e.sequence_number < MAX_SEQUENCE_NUMBER && chain.residue(e.sequence_number).is_some()
            })
            .collect();
    }

    let allowed: HashSet<i32> = selection
        .helices
        .iter()
        .flatten()
        .map(|e| e.sequence_number)
        .collect();

    chain.retain_residues(|r| {
        !r.key().hetero && r.insertion_code.is_none() && allowed.contains(&r.id)
    });

    Ok(selection)
}
