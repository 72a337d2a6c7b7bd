//! Position-by-position alignment of the reference receptor against its main template.
//!
//! Every aligned position is keyed by its generic number and stored as a tagged
//! [`AlignedPosition`]; segment boundaries get their own key so the alignment renders to the
//! `/`-separated strings PIR files expect. Anomaly resolution and residue switching edit the
//! template side in place through [`MainAlignment::set_template_residue`] and
//! [`MainAlignment::remove`].

use super::engine::{Alignment, Slot};
use crate::model::generic::GenericNumber;
use log::warn;
use serde::Serialize;
use std::fmt;

/// Why the template has no residue at a reference position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapKind {
    /// The template's numbering spans the position but skips it.
    Deletion,
    /// The template sequence ends before reaching the position.
    OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignedPosition {
    Match(char),
    Mismatch { reference: char, template: char },
    TemplateGap { reference: char, kind: GapKind },
    ReferenceGap { template: char },
    SegmentEnd,
}

impl AlignedPosition {
    /// Classifies a pair of residue letters.
    pub fn between(reference: char, template: char) -> Self {
        if reference == template {
            AlignedPosition::Match(reference)
        } else {
            AlignedPosition::Mismatch {
                reference,
                template,
            }
        }
    }

    pub fn reference_residue(&self) -> Option<char> {
        match *self {
            AlignedPosition::Match(letter) => Some(letter),
            AlignedPosition::Mismatch { reference, .. } => Some(reference),
            AlignedPosition::TemplateGap { reference, .. } => Some(reference),
            AlignedPosition::ReferenceGap { .. } | AlignedPosition::SegmentEnd => None,
        }
    }

    pub fn template_residue(&self) -> Option<char> {
        match *self {
            AlignedPosition::Match(letter) => Some(letter),
            AlignedPosition::Mismatch { template, .. } => Some(template),
            AlignedPosition::ReferenceGap { template } => Some(template),
            AlignedPosition::TemplateGap { .. } | AlignedPosition::SegmentEnd => None,
        }
    }

    pub fn reference_symbol(&self) -> char {
        match self {
            AlignedPosition::ReferenceGap { .. } => '-',
            AlignedPosition::SegmentEnd => '/',
            other => other.reference_residue().unwrap_or('-'),
        }
    }

    pub fn template_symbol(&self) -> char {
        match self {
            AlignedPosition::TemplateGap {
                kind: GapKind::Deletion,
                ..
            } => '-',
            AlignedPosition::TemplateGap {
                kind: GapKind::OutOfRange,
                ..
            } => 'x',
            AlignedPosition::SegmentEnd => '/',
            other => other.template_residue().unwrap_or('-'),
        }
    }

    /// Letter for matches, `.` for mismatches, `-` or `x` for gaps, `/` at segment ends.
    pub fn match_symbol(&self) -> char {
        match self {
            AlignedPosition::Match(letter) => *letter,
            AlignedPosition::Mismatch { .. } => '.',
            AlignedPosition::TemplateGap {
                kind: GapKind::OutOfRange,
                ..
            } => 'x',
            AlignedPosition::TemplateGap { .. } | AlignedPosition::ReferenceGap { .. } => '-',
            AlignedPosition::SegmentEnd => '/',
        }
    }

    /// Gap on one side that bulge/constriction handling may act on.
    pub fn is_deletion(&self) -> bool {
        matches!(
            self,
            AlignedPosition::ReferenceGap { .. }
                | AlignedPosition::TemplateGap {
                    kind: GapKind::Deletion,
                    ..
                }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlignmentKey {
    Generic(GenericNumber),
    /// End of the n-th aligned segment, counted from 1.
    SegmentEnd(usize),
}

impl fmt::Display for AlignmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignmentKey::Generic(gn) => write!(f, "{}", gn),
            AlignmentKey::SegmentEnd(n) => write!(f, "TM{}_end", n),
        }
    }
}

/// Recoverable data problem met while aligning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlignmentWarning {
    /// The two sequences put different generic numbers at the same aligned position.
    GenericNumberMismatch {
        segment: String,
        reference: GenericNumber,
        template: GenericNumber,
    },
}

impl fmt::Display for AlignmentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignmentWarning::GenericNumberMismatch {
                segment,
                reference,
                template,
            } => write!(
                f,
                "generic numbers do not align in {}: reference {} vs template {}",
                segment, reference, template
            ),
        }
    }
}

/// One segment's positions for both sides, as `(generic number, slot)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentPair {
    pub name: String,
    pub reference: Vec<(GenericNumber, Slot)>,
    pub template: Vec<(GenericNumber, Slot)>,
}

#[derive(Debug, Clone)]
pub struct MainAlignment {
    reference: String,
    template: String,
    positions: Vec<(AlignmentKey, AlignedPosition)>,
    warnings: Vec<AlignmentWarning>,
}

impl MainAlignment {
    /// Walks each segment pair in step and classifies every position.
    ///
    /// Positions where the reference is outside its numbered range, or where neither side has
    /// a residue, are left out. A position whose two generic numbers differ is skipped and
    /// recorded as a warning. Each segment closes with a [`AlignmentKey::SegmentEnd`] entry.
    pub fn from_segments(
        reference: impl Into<String>,
        template: impl Into<String>,
        segments: &[SegmentPair],
    ) -> Self {
        let mut alignment = Self {
            reference: reference.into(),
            template: template.into(),
            positions: Vec::new(),
            warnings: Vec::new(),
        };

        for (index, segment) in segments.iter().enumerate() {
            for (&(ref_gn, ref_slot), &(temp_gn, temp_slot)) in
                segment.reference.iter().zip(&segment.template)
            {
                let position = match (ref_slot, temp_slot) {
                    (Slot::Residue(r), Slot::Residue(t)) => AlignedPosition::between(r, t),
                    (Slot::Residue(r), Slot::Gap) => AlignedPosition::TemplateGap {
                        reference: r,
                        kind: GapKind::Deletion,
                    },
                    (Slot::Residue(r), Slot::OutOfRange) => AlignedPosition::TemplateGap {
                        reference: r,
                        kind: GapKind::OutOfRange,
                    },
                    (Slot::Gap, Slot::Residue(t)) => AlignedPosition::ReferenceGap { template: t },
                    _ => continue,
                };

                if ref_gn != temp_gn {
                    let warning = AlignmentWarning::GenericNumberMismatch {
                        segment: segment.name.clone(),
                        reference: ref_gn,
                        template: temp_gn,
                    };
                    warn!("{} ({} / {})", warning, alignment.reference, alignment.template);
                    alignment.warnings.push(warning);
                    continue;
                }

                alignment
                    .positions
                    .push((AlignmentKey::Generic(ref_gn), position));
            }
            alignment
                .positions
                .push((AlignmentKey::SegmentEnd(index + 1), AlignedPosition::SegmentEnd));
        }

        alignment
    }

    /// Aligns the reference of `alignment` with one of its loaded proteins.
    ///
    /// # Returns
    ///
    /// `None` if the alignment has no reference or does not contain `template_entry`.
    pub fn from_alignment(
        alignment: &Alignment<'_>,
        template_entry: &str,
        template_label: impl Into<String>,
    ) -> Option<Self> {
        let reference = alignment.reference()?;
        let template = alignment.protein(template_entry)?;

        let segments: Vec<SegmentPair> = alignment
            .columns()
            .iter()
            .enumerate()
            .map(|(index, columns)| SegmentPair {
                name: columns.name.clone(),
                reference: reference.segment_positions(columns, index).collect(),
                template: template.segment_positions(columns, index).collect(),
            })
            .collect();

        Some(Self::from_segments(
            reference.protein.entry_name.clone(),
            template_label,
            &segments,
        ))
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn positions(&self) -> &[(AlignmentKey, AlignedPosition)] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn slot(&self, gn: &GenericNumber) -> Option<usize> {
        let key = AlignmentKey::Generic(*gn);
        self.positions.iter().position(|(k, _)| *k == key)
    }

    pub fn get(&self, gn: &GenericNumber) -> Option<&AlignedPosition> {
        self.slot(gn).map(|i| &self.positions[i].1)
    }

    /// Generic-numbered positions matching `predicate`, in alignment order.
    pub fn generic_numbers_where<F>(&self, predicate: F) -> Vec<GenericNumber>
    where
        F: Fn(&AlignedPosition) -> bool,
    {
        self.positions
            .iter()
            .filter_map(|(key, position)| match key {
                AlignmentKey::Generic(gn) if predicate(position) => Some(*gn),
                _ => None,
            })
            .collect()
    }

    /// Replaces the template letter at `gn`, reclassifying the position.
    ///
    /// # Returns
    ///
    /// `false` if `gn` is not aligned.
    pub fn set_template_residue(&mut self, gn: &GenericNumber, letter: char) -> bool {
        let Some(index) = self.slot(gn) else {
            return false;
        };
        let position = &mut self.positions[index].1;
        *position = match position.reference_residue() {
            Some(reference) => AlignedPosition::between(reference, letter),
            None => AlignedPosition::ReferenceGap { template: letter },
        };
        true
    }

    /// Drops the position at `gn` from both sides.
    pub fn remove(&mut self, gn: &GenericNumber) -> Option<AlignedPosition> {
        let index = self.slot(gn)?;
        Some(self.positions.remove(index).1)
    }

    pub fn reference_string(&self) -> String {
        self.positions.iter().map(|(_, p)| p.reference_symbol()).collect()
    }

    pub fn template_string(&self) -> String {
        self.positions.iter().map(|(_, p)| p.template_symbol()).collect()
    }

    pub fn match_string(&self) -> String {
        self.positions.iter().map(|(_, p)| p.match_symbol()).collect()
    }

    /// Positions with a reference residue.
    pub fn reference_length(&self) -> usize {
        self.positions
            .iter()
            .filter(|(_, p)| p.reference_residue().is_some())
            .count()
    }

    pub fn conserved_count(&self) -> usize {
        self.positions
            .iter()
            .filter(|(_, p)| matches!(p, AlignedPosition::Match(_)))
            .count()
    }

    pub fn non_conserved_count(&self) -> usize {
        self.positions
            .iter()
            .filter(|(_, p)| matches!(p, AlignedPosition::Mismatch { .. }))
            .count()
    }

    pub fn warnings(&self) -> &[AlignmentWarning] {
        &self.warnings
    }
}
