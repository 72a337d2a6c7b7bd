//! Replacement of non-conserved template residues with the reference residue.

use super::aligner::{AlignedPosition, MainAlignment};
use super::library::TemplateLibrary;
use super::similarity::SimilarityTable;
use crate::db::Catalog;
use crate::io::{BackboneIssue, GpcrdbAtomTable};
use crate::model::generic::GenericNumber;
use log::{debug, warn};
use serde::Serialize;

/// Structure that supplied the reference residue at a non-conserved position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NonConservedTemplate {
    pub generic_number: GenericNumber,
    pub pdb_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwitchOutcome {
    pub switched: Vec<NonConservedTemplate>,
    /// Positions whose main-template residue was cut back to its backbone.
    pub truncated: Vec<GenericNumber>,
}

/// Switches mismatched template residues to the reference residue where a homologous
/// template confirms it.
///
/// For each mismatch, structures of proteins carrying the reference residue at the same
/// generic number are scanned in `templates` order; the first whose atom table agrees wins.
/// Positions no structure confirms keep their template letter, and the main-template residue
/// there is reduced to N, CA, C and O so its side chain is rebuilt downstream.
pub fn switch_non_conserved(
    alignment: &mut MainAlignment,
    catalog: &Catalog,
    templates: &SimilarityTable<'_>,
    library: &mut TemplateLibrary,
    main_table: &mut GpcrdbAtomTable,
) -> SwitchOutcome {
    let mut outcome = SwitchOutcome::default();
    let mismatches = alignment
        .generic_numbers_where(|p| matches!(p, AlignedPosition::Mismatch { .. }));

    for gn in mismatches {
        let Some(reference) = alignment.get(&gn).and_then(|p| p.reference_residue()) else {
            continue;
        };
        let proteins = catalog.proteins_with_generic_number(&gn, Some(reference));

        let source = templates
            .iter()
            .filter(|e| proteins.contains(e.protein.entry_name.as_str()))
            .find(|e| {
                library
                    .table(e.structure)
                    .and_then(|table| table.get(&gn))
                    .and_then(|residue| residue.one_letter())
                    == Some(reference)
            });

        match source {
            Some(entry) => {
                alignment.set_template_residue(&gn, reference);
                debug!("Switched {} to {} using {}", gn, reference, entry.structure.pdb_code);
                outcome.switched.push(NonConservedTemplate {
                    generic_number: gn,
                    pdb_code: entry.structure.pdb_code.clone(),
                });
            }
            None => {
                match main_table.truncate_to_backbone(&gn) {
                    Ok(()) => {}
                    Err(BackboneIssue::MissingResidue) => {
                        warn!("Missing residue in {} at {}", alignment.template(), gn)
                    }
                    Err(BackboneIssue::MissingAtoms(atoms)) => {
                        warn!("Missing atoms in {} at {}: {:?}", alignment.template(), gn, atoms)
                    }
                }
                outcome.truncated.push(gn);
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::homology::aligner::SegmentPair;
    use crate::homology::engine::{Slot, TRANSMEMBRANE_SEGMENTS};
    use crate::homology::fixtures::{catalog, gn, gpcrdb_chain, protein, structure, write_table};
    use crate::model::types::ConformationState::Inactive;

    #[test]
    fn switch_uses_first_confirming_template_and_truncates_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let residues = |a, b| vec![("3x49", 'D'), ("3x50", a), ("3x51", b)];
        let catalog = catalog(
            vec![
                protein("ref", &residues('R', 'Y')),
                protein("tpl", &residues('K', 'F')),
                protein("hom", &residues('R', 'F')),
                protein("far", &[("3x49", 'G'), ("3x50", 'R'), ("3x51", 'G')]),
            ],
            vec![
                structure("1TPL", "tpl", Inactive, 2.0),
                structure("1HOM", "hom", Inactive, 2.0),
                structure("1FAR", "far", Inactive, 2.0),
            ],
        );
        write_table(dir.path(), "1HOM", &residues('R', 'F'));
        write_table(dir.path(), "1FAR", &[("3x49", 'G'), ("3x50", 'R'), ("3x51", 'G')]);

        let reference = catalog.protein("ref").unwrap();
        let templates =
            SimilarityTable::rank(&catalog, reference, &[Inactive], &TRANSMEMBRANE_SEGMENTS);
        let to_slots = |r: &[(&str, char)]| -> Vec<(GenericNumber, Slot)> {
            r.iter().map(|(l, a)| (gn(l), Slot::Residue(*a))).collect()
        };
        let mut alignment = MainAlignment::from_segments(
            "ref",
            "1TPL",
            &[SegmentPair {
                name: "TM3".to_string(),
                reference: to_slots(&residues('R', 'Y')),
                template: to_slots(&residues('K', 'F')),
            }],
        );
        let mut main_table = GpcrdbAtomTable::from_chain(&gpcrdb_chain(&residues('K', 'F')));
        let mut library = TemplateLibrary::new(dir.path());

        let outcome = switch_non_conserved(
            &mut alignment,
            &catalog,
            &templates,
            &mut library,
            &mut main_table,
        );

        assert_eq!(
            outcome.switched,
            vec![NonConservedTemplate {
                generic_number: gn("3x50"),
                pdb_code: "1HOM".to_string(),
            }]
        );
        assert_eq!(outcome.truncated, vec![gn("3x51")]);
        assert_eq!(alignment.template_string(), "DRF/");
        assert_eq!(main_table.get(&gn("3x51")).unwrap().atom_count(), 4);
        assert_eq!(main_table.get(&gn("3x50")).unwrap().atom_count(), 5);
    }
}
