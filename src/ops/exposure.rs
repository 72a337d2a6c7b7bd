//! Solvent exposure of residues: accessible surface area and half-sphere exposure.
//!
//! Surface area follows the Shrake–Rupley scheme: every atom is inflated by the probe radius
//! and sampled with points on a Fibonacci sphere; the exposed fraction scales the full sphere
//! area. Half-sphere exposure counts neighbouring CA atoms on the CB side of each residue.

use super::axis::pseudo_cb;
use crate::model::chain::Chain;
use crate::model::grid::Grid;
use crate::model::residue::Residue;
use crate::model::structure::Structure;
use crate::model::types::Point;
use std::f64::consts::PI;

/// Solvent probe radius in Å.
pub const DEFAULT_PROBE_RADIUS: f64 = 1.4;

/// Sample points per atom sphere.
pub const DEFAULT_SPHERE_POINTS: usize = 960;

/// Neighbour sphere radius for half-sphere exposure, in Å.
pub const DEFAULT_HSE_RADIUS: f64 = 12.0;

/// Consecutive CA atoms further apart than this break a peptide.
pub const PEPTIDE_CA_DISTANCE: f64 = 4.3;

/// Evenly spread unit vectors on a sphere (golden-angle spiral).
pub fn fibonacci_sphere(samples: usize) -> Vec<[f64; 3]> {
    let samples = samples.max(1);
    let golden_angle = PI * (3.0 - 5f64.sqrt());
    let denom = samples.saturating_sub(1).max(1) as f64;

    (0..samples)
        .map(|i| {
            let y = 1.0 - 2.0 * i as f64 / denom;
            let radius = (1.0 - y * y).max(0.0).sqrt();
            let theta = golden_angle * i as f64;
            [theta.cos() * radius, y, theta.sin() * radius]
        })
        .collect()
}

/// Accessible surface area of every sphere in `spheres` (`(center, radius)` with the probe
/// already added).
pub fn sphere_areas(spheres: &[(Point, f64)], sphere_points: usize) -> Vec<f64> {
    if spheres.is_empty() {
        return Vec::new();
    }

    let points = fibonacci_sphere(sphere_points);
    let max_radius = spheres.iter().map(|(_, r)| *r).fold(0.0, f64::max);
    let grid = Grid::new(spheres.iter().enumerate().map(|(i, (c, _))| (*c, i)), 2.0 * max_radius);

    spheres
        .iter()
        .enumerate()
        .map(|(i, (center, radius))| {
            let neighbours: Vec<usize> = grid
                .within(center, radius + max_radius)
                .copied()
                .filter(|&j| {
                    j != i && nalgebra::distance(center, &spheres[j].0) < radius + spheres[j].1
                })
                .collect();

            let exposed = points
                .iter()
                .filter(|p| {
                    let sample = Point::new(
                        center.x + p[0] * radius,
                        center.y + p[1] * radius,
                        center.z + p[2] * radius,
                    );
                    !neighbours.iter().any(|&j| {
                        let (other, other_radius) = spheres[j];
                        nalgebra::distance_squared(&sample, &other) < other_radius * other_radius
                    })
                })
                .count();

            4.0 * PI * radius * radius * exposed as f64 / points.len() as f64
        })
        .collect()
}

/// Per-residue accessible surface area of a structure.
///
/// Heavy atoms of standard residues are measured together; areas are summed over runs of
/// consecutive atoms sharing a residue number, in file order.
pub fn residue_sasa(structure: &Structure, probe_radius: f64, sphere_points: usize) -> Vec<f64> {
    let atoms: Vec<(i32, Point, f64)> = structure
        .iter_atoms_with_context()
        .filter(|(_, residue, atom)| residue.is_standard() && atom.element.is_heavy_atom())
        .map(|(_, residue, atom)| (residue.id, atom.pos, atom.element.vdw_radius() + probe_radius))
        .collect();

    let spheres: Vec<(Point, f64)> = atoms.iter().map(|(_, p, r)| (*p, *r)).collect();
    let areas = sphere_areas(&spheres, sphere_points);

    let mut totals: Vec<f64> = Vec::new();
    let mut current: Option<i32> = None;
    for (&(resnum, _, _), area) in atoms.iter().zip(areas) {
        if current == Some(resnum) {
            if let Some(total) = totals.last_mut() {
                *total += area;
            }
        } else {
            totals.push(area);
            current = Some(resnum);
        }
    }
    totals
}

/// CA counts in the two half-spheres around a residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HalfSphereExposure {
    /// Neighbours on the CB side.
    pub up: u32,
    pub down: u32,
}

fn side_chain_direction(residue: &Residue) -> Option<Point> {
    if residue.is_glycine() {
        let n = residue.atom("N")?;
        let ca = residue.atom("CA")?;
        let c = residue.atom("C")?;
        Some(pseudo_cb(&n.pos, &ca.pos, &c.pos))
    } else {
        residue.atom("CB").map(|cb| cb.pos)
    }
}

/// Splits a chain into peptides: runs of standard residues with CA atoms whose consecutive
/// CAs lie within [`PEPTIDE_CA_DISTANCE`]. Runs of a single residue are dropped.
///
/// Returns residue indices into the chain.
pub fn peptides(chain: &Chain) -> Vec<Vec<usize>> {
    let mut result = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut last_ca: Option<Point> = None;

    for (index, residue) in chain.iter_residues().enumerate() {
        let ca = residue
            .atom("CA")
            .filter(|_| residue.is_standard())
            .map(|a| a.pos);

        let continues = match (ca, last_ca) {
            (Some(ca), Some(prev)) => nalgebra::distance(&ca, &prev) < PEPTIDE_CA_DISTANCE,
            _ => false,
        };

        if !continues {
            if current.len() > 1 {
                result.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        }

        if ca.is_some() {
            current.push(index);
        }
        last_ca = ca;
    }

    if current.len() > 1 {
        result.push(current);
    }
    result
}

/// CB-oriented half-sphere exposure for each residue of a chain.
///
/// The CA→CB vector (pseudo-CB for glycine) splits the sphere of `radius` around CA; CA atoms
/// of other peptide residues inside the sphere are counted per half. The result is aligned
/// with the chain's residues and holds `None` where no value could be computed.
pub fn half_sphere_exposure(chain: &Chain, radius: f64) -> Vec<Option<HalfSphereExposure>> {
    let residues = chain.residues();
    let members: Vec<usize> = peptides(chain).into_iter().flatten().collect();

    let grid = Grid::new(
        members.iter().filter_map(|&i| residues[i].atom("CA").map(|a| (a.pos, i))),
        radius,
    );

    let mut result = vec![None; residues.len()];
    for &index in &members {
        let residue = &residues[index];
        let (Some(ca), Some(cb)) = (residue.atom("CA"), side_chain_direction(residue)) else {
            continue;
        };
        let side = cb - ca.pos;

        let mut exposure = HalfSphereExposure::default();
        for &other in grid.within(&ca.pos, radius) {
            if other == index {
                continue;
            }
            let Some(other_ca) = residues[other].atom("CA") else {
                continue;
            };
            let d = other_ca.pos - ca.pos;
            if d.norm() >= radius {
                continue;
            }
            if side.angle(&d) < PI / 2.0 {
                exposure.up += 1;
            } else {
                exposure.down += 1;
            }
        }
        result[index] = Some(exposure);
    }
    result
}
