use super::error::Error;
use crate::io::{IoContext, read_pdb_file};
use crate::model::types::Point;
use std::path::Path;

/// Root-mean-square deviation between two equally long coordinate lists.
///
/// # Returns
///
/// `None` if the lists differ in length or are empty.
pub fn rmsd(first: &[Point], second: &[Point]) -> Option<f64> {
    if first.len() != second.len() || first.is_empty() {
        return None;
    }
    let sum: f64 = first
        .iter()
        .zip(second)
        .map(|(a, b)| nalgebra::distance_squared(a, b))
        .sum();
    Some((sum / first.len() as f64).sqrt())
}

/// RMSD between two models of the same receptor, pairing atoms in file order.
///
/// The files are not superposed; both models are expected to share a frame, as models built
/// on the same template do.
///
/// # Errors
///
/// Returns an error if either file cannot be read, if the atom counts differ, or if the
/// models are empty.
pub fn pdb_rmsd(first: &Path, second: &Path) -> Result<f64, Error> {
    let context = IoContext::default();
    let a: Vec<Point> = read_pdb_file(first, &context)?
        .iter_atoms()
        .map(|atom| atom.pos)
        .collect();
    let b: Vec<Point> = read_pdb_file(second, &context)?
        .iter_atoms()
        .map(|atom| atom.pos)
        .collect();

    if a.len() != b.len() {
        return Err(Error::AtomCountMismatch {
            first: a.len(),
            second: b.len(),
        });
    }
    rmsd(&a, &b).ok_or_else(|| Error::EmptyModel {
        path: first.to_path_buf(),
    })
}
