//! Generic-number alignment of receptor sequences.
//!
//! Receptors are aligned segment by segment on their generic numbers rather than by dynamic
//! programming: every generic number seen in any loaded protein becomes a column, and each
//! protein contributes its residue, a gap inside its own numbered span, or an out-of-range
//! marker beyond it. Similarity to the reference is the share of reference residues whose
//! counterpart scores positively in BLOSUM62.

use crate::db::Protein;
use crate::model::generic::GenericNumber;
use std::collections::{BTreeMap, BTreeSet};

/// Transmembrane segments aligned by default.
pub const TRANSMEMBRANE_SEGMENTS: [&str; 7] = ["TM1", "TM2", "TM3", "TM4", "TM5", "TM6", "TM7"];

/// Row/column order of [`BLOSUM62`].
const BLOSUM_ORDER: &[u8; 24] = b"ARNDCQEGHILKMFPSTWYVBZX*";

#[rustfmt::skip]
const BLOSUM62: [[i8; 24]; 24] = [
    [ 4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0, -2, -1,  0, -4],
    [-1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3, -1,  0, -1, -4],
    [-2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3,  3,  0, -1, -4],
    [-2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3,  4,  1, -1, -4],
    [ 0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1, -3, -3, -2, -4],
    [-1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2,  0,  3, -1, -4],
    [-1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4],
    [ 0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3, -1, -2, -1, -4],
    [-2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3,  0,  0, -1, -4],
    [-1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3, -3, -3, -1, -4],
    [-1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1, -4, -3, -1, -4],
    [-1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2,  0,  1, -1, -4],
    [-1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1, -3, -1, -1, -4],
    [-2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1, -3, -3, -1, -4],
    [-1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2, -2, -1, -2, -4],
    [ 1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2,  0,  0,  0, -4],
    [ 0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0, -1, -1,  0, -4],
    [-3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3, -4, -3, -2, -4],
    [-2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1, -3, -2, -1, -4],
    [ 0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4, -3, -2, -1, -4],
    [-2, -1,  3,  4, -3,  0,  1, -1,  0, -3, -4,  0, -3, -3, -2,  0, -1, -4, -3, -3,  4,  1, -1, -4],
    [-1,  0,  0,  1, -3,  3,  4, -2,  0, -3, -3,  1, -1, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4],
    [ 0, -1, -1, -1, -2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -2,  0,  0, -2, -1, -1, -1, -1, -1, -4],
    [-4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4,  1],
];

fn blosum_index(residue: char) -> usize {
    let upper = residue.to_ascii_uppercase();
    BLOSUM_ORDER
        .iter()
        .position(|&b| b as char == upper)
        .unwrap_or(22)
}

/// BLOSUM62 substitution score; unrecognised letters score as `X`.
pub fn blosum62(a: char, b: char) -> i32 {
    BLOSUM62[blosum_index(a)][blosum_index(b)] as i32
}

/// Content of one alignment column for one protein.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Residue(char),
    /// No residue at this number although the protein's numbering spans it (`-`).
    Gap,
    /// The number lies before the first or after the last numbered residue (`_`).
    OutOfRange,
}

impl Slot {
    pub fn symbol(&self) -> char {
        match self {
            Slot::Residue(letter) => *letter,
            Slot::Gap => '-',
            Slot::OutOfRange => '_',
        }
    }

    pub fn residue(&self) -> Option<char> {
        match self {
            Slot::Residue(letter) => Some(*letter),
            _ => None,
        }
    }
}

/// Columns of one segment, shared by every aligned protein.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentColumns {
    pub name: String,
    pub generic_numbers: Vec<GenericNumber>,
}

/// One protein's rows in an [`Alignment`].
#[derive(Debug, Clone)]
pub struct AlignedProtein<'a> {
    pub protein: &'a Protein,
    /// One slot per column, per segment.
    pub segments: Vec<Vec<Slot>>,
    /// Percent similarity to the reference; zero until computed.
    pub similarity: u32,
}

impl AlignedProtein<'_> {
    /// `(generic number, slot)` pairs of one segment.
    pub fn segment_positions<'s>(
        &'s self,
        columns: &'s SegmentColumns,
        segment: usize,
    ) -> impl Iterator<Item = (GenericNumber, Slot)> + 's {
        columns
            .generic_numbers
            .iter()
            .copied()
            .zip(self.segments[segment].iter().copied())
    }
}

/// Column-per-generic-number alignment of a reference and its targets.
#[derive(Debug, Clone)]
pub struct Alignment<'a> {
    columns: Vec<SegmentColumns>,
    proteins: Vec<AlignedProtein<'a>>,
    has_reference: bool,
}

impl<'a> Alignment<'a> {
    /// Aligns `reference` (when given, placed first) and `targets` over `segments`.
    ///
    /// Targets sharing the reference's entry name, or repeated, are aligned once.
    pub fn build<S: AsRef<str>>(
        reference: Option<&'a Protein>,
        targets: &[&'a Protein],
        segments: &[S],
    ) -> Self {
        let mut proteins: Vec<&'a Protein> = Vec::with_capacity(targets.len() + 1);
        for protein in reference.into_iter().chain(targets.iter().copied()) {
            if !proteins.iter().any(|p| p.entry_name == protein.entry_name) {
                proteins.push(protein);
            }
        }

        let mut columns = Vec::with_capacity(segments.len());
        let mut rows: Vec<Vec<Vec<Slot>>> = vec![Vec::with_capacity(segments.len()); proteins.len()];

        for segment in segments {
            let segment = segment.as_ref();
            let per_protein: Vec<BTreeMap<GenericNumber, char>> = proteins
                .iter()
                .map(|p| {
                    p.segment_residues(segment)
                        .filter_map(|r| r.generic_number.map(|gn| (gn, r.amino_acid)))
                        .collect()
                })
                .collect();

            let numbers: BTreeSet<GenericNumber> =
                per_protein.iter().flat_map(|m| m.keys().copied()).collect();
            let numbers: Vec<GenericNumber> = numbers.into_iter().collect();

            for (row, residues) in rows.iter_mut().zip(&per_protein) {
                let span = residues
                    .keys()
                    .next()
                    .zip(residues.keys().next_back())
                    .map(|(first, last)| (*first, *last));
                let slots = numbers
                    .iter()
                    .map(|gn| match residues.get(gn) {
                        Some(&letter) => Slot::Residue(letter),
                        None => match span {
                            Some((first, last)) if first < *gn && *gn < last => Slot::Gap,
                            _ => Slot::OutOfRange,
                        },
                    })
                    .collect();
                row.push(slots);
            }

            columns.push(SegmentColumns {
                name: segment.to_string(),
                generic_numbers: numbers,
            });
        }

        let proteins = proteins
            .into_iter()
            .zip(rows)
            .map(|(protein, segments)| AlignedProtein {
                protein,
                segments,
                similarity: 0,
            })
            .collect();

        Self {
            columns,
            proteins,
            has_reference: reference.is_some(),
        }
    }

    pub fn columns(&self) -> &[SegmentColumns] {
        &self.columns
    }

    pub fn proteins(&self) -> &[AlignedProtein<'a>] {
        &self.proteins
    }

    pub fn protein(&self, entry_name: &str) -> Option<&AlignedProtein<'a>> {
        self.proteins
            .iter()
            .find(|p| p.protein.entry_name == entry_name)
    }

    pub fn reference(&self) -> Option<&AlignedProtein<'a>> {
        self.has_reference.then(|| &self.proteins[0])
    }

    /// Scores every protein against the reference and orders targets by similarity.
    ///
    /// The reference stays first; targets with equal scores keep their load order. Without a
    /// reference this does nothing.
    pub fn calculate_similarity(&mut self) {
        if !self.has_reference || self.proteins.is_empty() {
            return;
        }

        let reference_segments = self.proteins[0].segments.clone();
        for aligned in self.proteins.iter_mut() {
            aligned.similarity = similarity(&reference_segments, &aligned.segments);
        }
        self.proteins[1..].sort_by(|a, b| b.similarity.cmp(&a.similarity));
    }
}

fn similarity(reference: &[Vec<Slot>], target: &[Vec<Slot>]) -> u32 {
    let mut reference_residues = 0usize;
    let mut similar = 0usize;
    for (ref_segment, target_segment) in reference.iter().zip(target) {
        for (r, t) in ref_segment.iter().zip(target_segment) {
            let Some(r) = r.residue() else { continue };
            reference_residues += 1;
            if t.residue().is_some_and(|t| blosum62(r, t) > 0) {
                similar += 1;
            }
        }
    }
    if reference_residues == 0 {
        return 0;
    }
    (100.0 * similar as f64 / reference_residues as f64).round() as u32
}
