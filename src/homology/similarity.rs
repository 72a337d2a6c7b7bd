//! Template ranking by BLOSUM62 similarity to the reference receptor.

use super::engine::Alignment;
use super::error::Error;
use crate::db::{Catalog, Protein, StructureEntry};
use crate::model::types::ConformationState;
use log::{debug, info};

#[derive(Debug, Clone, Copy)]
pub struct SimilarityEntry<'a> {
    pub structure: &'a StructureEntry,
    pub protein: &'a Protein,
    pub similarity: u32,
}

/// Template structures ranked by sequence similarity to a reference receptor.
#[derive(Debug, Clone, Default)]
pub struct SimilarityTable<'a> {
    entries: Vec<SimilarityEntry<'a>>,
}

impl<'a> SimilarityTable<'a> {
    /// Ranks the best-resolution structure of every other protein with a structure in `states`.
    ///
    /// # Arguments
    ///
    /// * `catalog` - Source of proteins and structures.
    /// * `reference` - Receptor being modeled; its own structures are never candidates.
    /// * `states` - Conformation states a template may be in.
    /// * `segments` - Segments the similarity is measured over.
    ///
    /// # Returns
    ///
    /// Entries ordered by similarity, highest first; equal scores keep catalog order.
    pub fn rank<S: AsRef<str>>(
        catalog: &'a Catalog,
        reference: &'a Protein,
        states: &[ConformationState],
        segments: &[S],
    ) -> Self {
        let structures: Vec<&StructureEntry> = catalog
            .best_structures(states)
            .into_iter()
            .filter(|s| s.protein != reference.entry_name)
            .collect();

        let targets: Vec<&Protein> = structures
            .iter()
            .filter_map(|s| catalog.protein_of(s))
            .collect();

        let mut alignment = Alignment::build(Some(reference), &targets, segments);
        alignment.calculate_similarity();

        let entries: Vec<SimilarityEntry<'a>> = alignment
            .proteins()
            .iter()
            .skip(1)
            .filter_map(|aligned| {
                let structure = structures
                    .iter()
                    .copied()
                    .find(|s| s.protein == aligned.protein.entry_name)?;
                Some(SimilarityEntry {
                    structure,
                    protein: aligned.protein,
                    similarity: aligned.similarity,
                })
            })
            .collect();

        for entry in &entries {
            debug!(
                "{} ({}): {}% similar to {}",
                entry.structure.pdb_code,
                entry.protein.entry_name,
                entry.similarity,
                reference.entry_name
            );
        }
        info!(
            "Ranked {} template structures for {} in states {:?}",
            entries.len(),
            reference.entry_name,
            states
        );

        Self { entries }
    }

    /// First-ranked entry, the template the model is built on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTemplates`] when the table is empty.
    pub fn main_template(
        &self,
        reference: &Protein,
        states: &[ConformationState],
    ) -> Result<&SimilarityEntry<'a>, Error> {
        self.entries.first().ok_or_else(|| Error::NoTemplates {
            entry_name: reference.entry_name.clone(),
            states: states.to_vec(),
        })
    }

    pub fn entries(&self) -> &[SimilarityEntry<'a>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimilarityEntry<'a>> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::homology::fixtures::{catalog, protein, structure};
    use crate::homology::engine::TRANSMEMBRANE_SEGMENTS;
    use ConformationState::{Active, Inactive};

    fn fixture() -> Catalog {
        catalog(
            vec![
                protein("ref", &[("1x49", 'L'), ("1x50", 'N'), ("1x51", 'V')]),
                protein("low", &[("1x49", 'G'), ("1x50", 'G'), ("1x51", 'G')]),
                protein("high", &[("1x49", 'L'), ("1x50", 'N'), ("1x51", 'I')]),
                protein("mid", &[("1x49", 'I'), ("1x50", 'P'), ("1x51", 'P')]),
            ],
            vec![
                structure("1REF", "ref", Inactive, 2.0),
                structure("1LOW", "low", Inactive, 2.0),
                structure("1HIA", "high", Inactive, 3.1),
                structure("1HIB", "high", Inactive, 2.4),
                structure("1HIC", "high", Active, 1.0),
                structure("1MID", "mid", Inactive, 2.8),
            ],
        )
    }

    #[test]
    fn rank_orders_by_similarity_and_excludes_reference() {
        let catalog = fixture();
        let reference = catalog.protein("ref").unwrap();
        let table = SimilarityTable::rank(&catalog, reference, &[Inactive], &TRANSMEMBRANE_SEGMENTS);

        let ranked: Vec<(&str, u32)> = table
            .iter()
            .map(|e| (e.structure.pdb_code.as_str(), e.similarity))
            .collect();
        assert_eq!(ranked, vec![("1HIB", 100), ("1MID", 33), ("1LOW", 0)]);
    }

    #[test]
    fn rank_respects_requested_states() {
        let catalog = fixture();
        let reference = catalog.protein("ref").unwrap();
        let table = SimilarityTable::rank(
            &catalog,
            reference,
            &[Inactive, Active],
            &TRANSMEMBRANE_SEGMENTS,
        );
        let main = table.main_template(reference, &[Inactive, Active]).unwrap();
        assert_eq!(main.structure.pdb_code, "1HIC");
    }

    #[test]
    fn main_template_fails_without_candidates() {
        let catalog = fixture();
        let reference = catalog.protein("ref").unwrap();
        let table = SimilarityTable::rank(
            &catalog,
            reference,
            &[ConformationState::Intermediate],
            &TRANSMEMBRANE_SEGMENTS,
        );
        assert!(table.is_empty());
        assert!(matches!(
            table.main_template(reference, &[ConformationState::Intermediate]),
            Err(Error::NoTemplates { .. })
        ));
    }
}
