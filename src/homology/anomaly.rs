//! Bulge and constriction handling for gaps in the main alignment.
//!
//! A deletion flanked by residues on the intact side marks a structural irregularity: with a
//! three-digit generic number it is a bulge (an extra residue), otherwise a constriction (a
//! missing one). Each is repaired by borrowing the residues around the site from another
//! template that shares the reference's local helix geometry.

use super::aligner::{AlignedPosition, MainAlignment};
use super::library::TemplateLibrary;
use super::similarity::SimilarityTable;
use crate::db::Catalog;
use crate::model::generic::GenericNumber;
use log::{debug, info};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyKind {
    /// The reference carries an extra residue the template lacks.
    ReferenceBulge,
    /// The template carries an extra residue the reference lacks.
    TemplateBulge,
    /// The reference lacks a residue the template has.
    ReferenceConstriction,
    /// The template lacks a residue the reference has.
    TemplateConstriction,
}

impl AnomalyKind {
    pub fn is_bulge(&self) -> bool {
        matches!(self, AnomalyKind::ReferenceBulge | AnomalyKind::TemplateBulge)
    }

    /// Whether the fetched window includes the anomalous position itself.
    fn includes_site(&self) -> bool {
        matches!(
            self,
            AnomalyKind::ReferenceBulge | AnomalyKind::TemplateConstriction
        )
    }

    /// Whether the aligned position is dropped even after a successful substitution.
    fn always_removed(&self) -> bool {
        !self.includes_site()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anomaly {
    pub generic_number: GenericNumber,
    pub kind: AnomalyKind,
}

impl Anomaly {
    /// Label used in statistics: the number itself for bulges, the flanking pair for
    /// constrictions.
    pub fn location(&self) -> String {
        let gn = self.generic_number;
        if self.kind.is_bulge() {
            return gn.to_string();
        }
        match (gn.offset(-1), gn.offset(1)) {
            (Some(before), Some(after)) => format!("{}-{}", before, after),
            _ => gn.to_string(),
        }
    }

    /// Generic numbers fetched from an alternative template, in helix order.
    fn window(&self) -> Option<Vec<GenericNumber>> {
        let gn = self.generic_number;
        let mut window = vec![gn.offset(-2)?, gn.offset(-1)?];
        if self.kind.includes_site() {
            window.push(gn);
        }
        window.extend([gn.offset(1)?, gn.offset(2)?]);
        Some(window)
    }

    /// Proteins whose structures may serve as the alternative template.
    fn candidates<'c>(&self, catalog: &'c Catalog) -> HashSet<&'c str> {
        let gn = self.generic_number;
        match self.kind {
            AnomalyKind::ReferenceBulge | AnomalyKind::TemplateConstriction => {
                catalog.proteins_with_generic_number(&gn, None)
            }
            AnomalyKind::TemplateBulge => without(
                catalog.proteins_with_generic_number(&gn.base(), None),
                catalog.proteins_with_generic_number(&gn, None),
            ),
            AnomalyKind::ReferenceConstriction => match gn.offset(-1) {
                Some(before) => without(
                    catalog.proteins_with_generic_number(&before, None),
                    catalog.proteins_with_generic_number(&gn, None),
                ),
                None => HashSet::new(),
            },
        }
    }
}

fn without<'c>(set: HashSet<&'c str>, excluded: HashSet<&'c str>) -> HashSet<&'c str> {
    set.difference(&excluded).copied().collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnomalyRecord {
    pub location: String,
    /// PDB code of the structure the site was rebuilt from.
    pub template: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnomalyReport {
    pub reference_bulges: Vec<AnomalyRecord>,
    pub template_bulges: Vec<AnomalyRecord>,
    pub reference_constrictions: Vec<AnomalyRecord>,
    pub template_constrictions: Vec<AnomalyRecord>,
}

impl AnomalyReport {
    fn push(&mut self, kind: AnomalyKind, record: AnomalyRecord) {
        match kind {
            AnomalyKind::ReferenceBulge => self.reference_bulges.push(record),
            AnomalyKind::TemplateBulge => self.template_bulges.push(record),
            AnomalyKind::ReferenceConstriction => self.reference_constrictions.push(record),
            AnomalyKind::TemplateConstriction => self.template_constrictions.push(record),
        }
    }

    pub fn len(&self) -> usize {
        self.reference_bulges.len()
            + self.template_bulges.len()
            + self.reference_constrictions.len()
            + self.template_constrictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn is_reference_residue(alignment: &MainAlignment, gn: Option<GenericNumber>) -> bool {
    gn.and_then(|gn| alignment.get(&gn))
        .is_some_and(|p| p.reference_residue().is_some())
}

fn is_template_residue(alignment: &MainAlignment, gn: Option<GenericNumber>) -> bool {
    gn.and_then(|gn| alignment.get(&gn))
        .is_some_and(|p| p.template_residue().is_some())
}

/// Classifies every deletion flanked by residues on the intact side.
pub fn find_anomalies(alignment: &MainAlignment) -> Vec<Anomaly> {
    let deletions = alignment.generic_numbers_where(AlignedPosition::is_deletion);

    deletions
        .into_iter()
        .filter_map(|gn| {
            let position = alignment.get(&gn)?;
            let flanks = (gn.offset(-1), gn.offset(1));
            let kind = match position {
                AlignedPosition::ReferenceGap { .. } => {
                    if !is_reference_residue(alignment, flanks.0)
                        || !is_reference_residue(alignment, flanks.1)
                    {
                        return None;
                    }
                    if gn.has_insertion() {
                        AnomalyKind::TemplateBulge
                    } else {
                        AnomalyKind::ReferenceConstriction
                    }
                }
                _ => {
                    if !is_template_residue(alignment, flanks.0)
                        || !is_template_residue(alignment, flanks.1)
                    {
                        return None;
                    }
                    if gn.has_insertion() {
                        AnomalyKind::ReferenceBulge
                    } else {
                        AnomalyKind::TemplateConstriction
                    }
                }
            };
            Some(Anomaly {
                generic_number: gn,
                kind,
            })
        })
        .collect()
}

/// Which anomaly kinds [`resolve_anomalies`] acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnomalySwitches {
    pub bulges: bool,
    pub constrictions: bool,
}

impl Default for AnomalySwitches {
    fn default() -> Self {
        Self {
            bulges: true,
            constrictions: true,
        }
    }
}

/// Rebuilds bulge and constriction sites from alternative templates.
///
/// Candidates are scanned in `templates` order and the first structure whose atom table
/// holds the whole window wins. Inner window residues replace the template letters; the
/// outer two anchor the site and are left alone. Sites where the reference lacks the residue
/// are always removed from the alignment; the others are removed only when no candidate
/// succeeds.
///
/// # Arguments
///
/// * `alignment` - Main alignment, edited in place.
/// * `catalog` - Source of per-protein generic numbers for candidate selection.
/// * `templates` - Candidate structures ranked by similarity, typically across all states.
/// * `library` - Atom tables of the candidates.
/// * `switches` - Anomaly kinds to act on; others are left untouched and unreported.
pub fn resolve_anomalies(
    alignment: &mut MainAlignment,
    catalog: &Catalog,
    templates: &SimilarityTable<'_>,
    library: &mut TemplateLibrary,
    switches: AnomalySwitches,
) -> AnomalyReport {
    let mut report = AnomalyReport::default();

    for anomaly in find_anomalies(alignment) {
        let enabled = if anomaly.kind.is_bulge() {
            switches.bulges
        } else {
            switches.constrictions
        };
        if !enabled {
            continue;
        }

        let template = borrow_window(alignment, catalog, templates, library, &anomaly);
        if anomaly.kind.always_removed() || template.is_none() {
            alignment.remove(&anomaly.generic_number);
        }

        info!(
            "{:?} at {}: {}",
            anomaly.kind,
            anomaly.location(),
            template.as_deref().unwrap_or("no template found")
        );
        report.push(
            anomaly.kind,
            AnomalyRecord {
                location: anomaly.location(),
                template,
            },
        );
    }

    report
}

fn borrow_window(
    alignment: &mut MainAlignment,
    catalog: &Catalog,
    templates: &SimilarityTable<'_>,
    library: &mut TemplateLibrary,
    anomaly: &Anomaly,
) -> Option<String> {
    let window = anomaly.window()?;
    let candidates = anomaly.candidates(catalog);

    for entry in templates
        .iter()
        .filter(|e| candidates.contains(e.protein.entry_name.as_str()))
    {
        let Some(table) = library.table(entry.structure) else {
            continue;
        };
        let letters: Option<Vec<char>> = table
            .fetch_window(&window)
            .and_then(|residues| residues.iter().map(|r| r.one_letter()).collect());
        let Some(letters) = letters else {
            debug!(
                "{} lacks the window around {}",
                entry.structure.pdb_code, anomaly.generic_number
            );
            continue;
        };

        let inner = 1..window.len() - 1;
        for (gn, letter) in window[inner.clone()].iter().zip(&letters[inner]) {
            alignment.set_template_residue(gn, *letter);
        }
        return Some(entry.structure.pdb_code.clone());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::homology::aligner::SegmentPair;
    use crate::homology::engine::{Slot, TRANSMEMBRANE_SEGMENTS};
    use crate::homology::fixtures::{catalog, gn, protein, structure, write_table};
    use crate::model::types::ConformationState::Inactive;

    fn alignment(reference: &[(&str, Slot)], template: &[(&str, Slot)]) -> MainAlignment {
        MainAlignment::from_segments(
            "ref",
            "1TPL",
            &[SegmentPair {
                name: "TM2".to_string(),
                reference: reference.iter().map(|(l, s)| (gn(l), *s)).collect(),
                template: template.iter().map(|(l, s)| (gn(l), *s)).collect(),
            }],
        )
    }

    use Slot::{Gap, Residue as R};

    #[test]
    fn find_anomalies_classifies_by_suffix_and_side() {
        let aligned = alignment(
            &[
                ("2x40", R('A')),
                ("2x41", R('L')),
                ("2x411", R('G')),
                ("2x42", R('V')),
                ("2x43", R('F')),
                ("2x44", Gap),
                ("2x45", R('S')),
            ],
            &[
                ("2x40", R('A')),
                ("2x41", R('L')),
                ("2x411", Gap),
                ("2x42", R('I')),
                ("2x43", R('F')),
                ("2x44", R('T')),
                ("2x45", R('S')),
            ],
        );
        assert_eq!(
            find_anomalies(&aligned),
            vec![
                Anomaly {
                    generic_number: gn("2x411"),
                    kind: AnomalyKind::ReferenceBulge
                },
                Anomaly {
                    generic_number: gn("2x44"),
                    kind: AnomalyKind::ReferenceConstriction
                },
            ]
        );
    }

    #[test]
    fn find_anomalies_requires_flanking_residues() {
        let aligned = alignment(
            &[("2x40", R('A')), ("2x41", Gap), ("2x42", Gap), ("2x43", R('F'))],
            &[("2x40", R('A')), ("2x41", R('L')), ("2x42", R('V')), ("2x43", R('F'))],
        );
        assert!(find_anomalies(&aligned).is_empty());
    }

    #[test]
    fn location_labels_constrictions_by_flanks() {
        let constriction = Anomaly {
            generic_number: gn("7x44"),
            kind: AnomalyKind::TemplateConstriction,
        };
        assert_eq!(constriction.location(), "7x43-7x45");
        let bulge = Anomaly {
            generic_number: gn("2x551"),
            kind: AnomalyKind::TemplateBulge,
        };
        assert_eq!(bulge.location(), "2x551");
        assert_eq!(
            bulge.window().unwrap(),
            vec![gn("2x54"), gn("2x55"), gn("2x56"), gn("2x57")]
        );
    }

    #[test]
    fn resolve_reference_bulge_substitutes_inner_window() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog(
            vec![
                protein("ref", &[("2x39", 'M'), ("2x40", 'A'), ("2x41", 'L'), ("2x411", 'G'), ("2x42", 'V'), ("2x43", 'F')]),
                protein("tpl", &[("2x39", 'M'), ("2x40", 'A'), ("2x41", 'L'), ("2x42", 'I'), ("2x43", 'F')]),
                protein("alt", &[("2x39", 'M'), ("2x40", 'S'), ("2x41", 'T'), ("2x411", 'P'), ("2x42", 'W'), ("2x43", 'Y')]),
            ],
            vec![
                structure("1TPL", "tpl", Inactive, 2.0),
                structure("1ALT", "alt", Inactive, 2.0),
            ],
        );
        write_table(
            dir.path(),
            "1ALT",
            &[("2x39", 'M'), ("2x40", 'S'), ("2x41", 'T'), ("2x411", 'P'), ("2x42", 'W'), ("2x43", 'Y')],
        );

        let reference = catalog.protein("ref").unwrap();
        let templates = SimilarityTable::rank(&catalog, reference, &[Inactive], &TRANSMEMBRANE_SEGMENTS);
        let mut aligned = alignment(
            &[("2x39", R('M')), ("2x40", R('A')), ("2x41", R('L')), ("2x411", R('G')), ("2x42", R('V')), ("2x43", R('F'))],
            &[("2x39", R('M')), ("2x40", R('A')), ("2x41", R('L')), ("2x411", Gap), ("2x42", R('I')), ("2x43", R('F'))],
        );
        let mut library = TemplateLibrary::new(dir.path());

        let report = resolve_anomalies(
            &mut aligned,
            &catalog,
            &templates,
            &mut library,
            AnomalySwitches::default(),
        );

        assert_eq!(
            report.reference_bulges,
            vec![AnomalyRecord {
                location: "2x411".to_string(),
                template: Some("1ALT".to_string()),
            }]
        );
        assert_eq!(aligned.template_string(), "MATPWF/");
        assert_eq!(aligned.reference_string(), "MALGVF/");
    }

    #[test]
    fn resolve_removes_site_when_no_candidate_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog(
            vec![
                protein("ref", &[("2x40", 'A'), ("2x41", 'L'), ("2x42", 'V'), ("2x43", 'F'), ("2x44", 'S')]),
                protein("tpl", &[("2x40", 'A'), ("2x41", 'L'), ("2x43", 'F'), ("2x44", 'S')]),
            ],
            vec![structure("1TPL", "tpl", Inactive, 2.0)],
        );
        let reference = catalog.protein("ref").unwrap();
        let templates = SimilarityTable::rank(&catalog, reference, &[Inactive], &TRANSMEMBRANE_SEGMENTS);
        let mut aligned = alignment(
            &[("2x40", R('A')), ("2x41", R('L')), ("2x42", R('V')), ("2x43", R('F')), ("2x44", R('S'))],
            &[("2x40", R('A')), ("2x41", R('L')), ("2x42", Gap), ("2x43", R('F')), ("2x44", R('S'))],
        );
        let mut library = TemplateLibrary::new(dir.path());

        let report = resolve_anomalies(
            &mut aligned,
            &catalog,
            &templates,
            &mut library,
            AnomalySwitches::default(),
        );

        assert_eq!(report.template_constrictions[0].location, "2x41-2x43");
        assert_eq!(report.template_constrictions[0].template, None);
        assert!(aligned.get(&gn("2x42")).is_none());
        assert_eq!(aligned.reference_string(), "ALFS/");
    }

    #[test]
    fn disabled_switches_leave_alignment_untouched() {
        let catalog = catalog(vec![protein("ref", &[("2x40", 'A')])], vec![]);
        let reference = catalog.protein("ref").unwrap();
        let templates = SimilarityTable::rank(&catalog, reference, &[Inactive], &TRANSMEMBRANE_SEGMENTS);
        let mut aligned = alignment(
            &[("2x40", R('A')), ("2x41", Gap), ("2x42", R('V'))],
            &[("2x40", R('A')), ("2x41", R('L')), ("2x42", R('V'))],
        );
        let mut library = TemplateLibrary::new("missing");

        let report = resolve_anomalies(
            &mut aligned,
            &catalog,
            &templates,
            &mut library,
            AnomalySwitches {
                bulges: true,
                constrictions: false,
            },
        );
        assert!(report.is_empty());
        assert_eq!(aligned.reference_string(), "A-V/");
    }
}
