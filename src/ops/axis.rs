//! Helix traces and the axes fitted through them.
//!
//! Each helix contributes a CA trace and a matching CB trace (with a pseudo-CB for glycine).
//! The CA trace is smoothed over consecutive windows of three residues, and principal-component
//! lines through the smoothed traces give one axis per helix plus a bundle axis that serves as
//! the reference frame for every angle.

use super::error::Error;
use super::filter::{HELIX_COUNT, HelixSelection};
use super::pca::{AxisLine, PrincipalAxes};
use crate::model::chain::Chain;
use crate::model::residue::Residue;
use crate::model::types::Point;
use nalgebra::{Rotation3, Unit, Vector3};

/// Number of consecutive CA positions averaged into one smoothed trace point.
pub const SMOOTHING_WINDOW: usize = 3;

/// CA and CB positions of one helix in ascending sequence order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HelixTrace {
    pub ca: Vec<Point>,
    pub cb: Vec<Point>,
}

impl HelixTrace {
    pub fn len(&self) -> usize {
        self.ca.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ca.is_empty()
    }
}

/// Places a virtual CB from the backbone of a residue.
///
/// The N−CA bond vector is rotated by +120° about the C−CA bond vector and re-anchored at CA,
/// which puts the pseudo-atom where an L-amino-acid CB would sit.
pub fn pseudo_cb(n: &Point, ca: &Point, c: &Point) -> Point {
    let axis = Unit::new_normalize(c - ca);
    let rotation = Rotation3::from_axis_angle(&axis, 120f64.to_radians());
    ca + rotation * (n - ca)
}

fn required_atom(residue: &Residue, name: &str) -> Result<Point, Error> {
    residue
        .atom(name)
        .map(|a| a.pos)
        .ok_or_else(|| Error::missing_atom(&residue.name, residue.id, name))
}

fn cb_position(residue: &Residue) -> Result<Point, Error> {
    match residue.atom("CB") {
        Some(cb) => Ok(cb.pos),
        None => Ok(pseudo_cb(
            &required_atom(residue, "N")?,
            &required_atom(residue, "CA")?,
            &required_atom(residue, "C")?,
        )),
    }
}

/// Collects the CA/CB traces of the selected helices from the filtered chain.
///
/// # Errors
///
/// Returns [`Error::MissingAtom`] when a residue lacks CA, or lacks CB together with one of
/// the backbone atoms needed to place a pseudo-CB.
pub fn helix_traces(chain: &Chain, selection: &HelixSelection) -> Result<Vec<HelixTrace>, Error> {
    selection
        .helices()
        .iter()
        .map(|entries| {
            let mut trace = HelixTrace::default();
            for entry in entries {
                let Some(residue) = chain.residue(entry.sequence_number) else {
                    continue;
                };
                trace.ca.push(required_atom(residue, "CA")?);
                trace.cb.push(cb_position(residue)?);
            }
            Ok(trace)
        })
        .collect()
}

/// Averages non-overlapping windows of [`SMOOTHING_WINDOW`] points; a trailing partial window
/// is dropped.
pub fn smooth_trace(points: &[Point]) -> Vec<Point> {
    points
        .chunks_exact(SMOOTHING_WINDOW)
        .map(|window| {
            let sum: Vector3<f64> = window.iter().map(|p| p.coords).sum();
            Point::from(sum / SMOOTHING_WINDOW as f64)
        })
        .collect()
}

/// Half of a smoothed trace nearest the extracellular side.
///
/// Helices alternate direction across the membrane. Even-indexed helices start
/// extracellular and contribute their leading half; odd-indexed helices contribute their
/// trailing half read backwards, excluding the middle point.
pub fn extracellular_half(reduced: &[Point], helix_index: usize) -> Vec<Point> {
    let half = reduced.len() / 2;
    if helix_index % 2 == 0 {
        reduced[..half].to_vec()
    } else {
        let start = (half + 1).min(reduced.len());
        reduced[start..]
            .iter()
            .rev()
            .copied()
            .collect()
    }
}

fn centroid(points: &[Point]) -> Point {
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    Point::from(sum / points.len().max(1) as f64)
}

/// Per-helix axes and the bundle axis that defines the angle reference frame.
#[derive(Debug, Clone)]
pub struct BundleAxes {
    pub helix_axes: Vec<PrincipalAxes>,
    pub helix_lines: Vec<AxisLine>,
    pub global: PrincipalAxes,
    pub global_line: AxisLine,
}

/// Fits helix axes and the bundle axis.
///
/// With `extracellular` set, the bundle axis is fitted through the extracellular half-axis of
/// every helix, each shifted so its midpoint coincides with the mean of the full smoothed
/// trace. Otherwise it is fitted through all smoothed points of all helices.
///
/// # Errors
///
/// Propagates PCA failures, naming the helix or bundle that could not be fitted.
pub fn build_axes(traces: &[HelixTrace], extracellular: bool) -> Result<BundleAxes, Error> {
    if traces.len() != HELIX_COUNT {
        return Err(Error::insufficient_points(
            "helix bundle",
            traces.len(),
            HELIX_COUNT,
        ));
    }

    let reduced: Vec<Vec<Point>> = traces.iter().map(|t| smooth_trace(&t.ca)).collect();

    let mut helix_axes = Vec::with_capacity(HELIX_COUNT);
    let mut helix_lines = Vec::with_capacity(HELIX_COUNT);
    for (index, points) in reduced.iter().enumerate() {
        let (axes, line) = AxisLine::fit(points, index % 2 == 1, &format!("helix {}", index + 1))?;
        helix_axes.push(axes);
        helix_lines.push(line);
    }

    let bundle_points: Vec<Point> = if extracellular {
        let mut stacked = Vec::with_capacity(2 * HELIX_COUNT);
        for (index, points) in reduced.iter().enumerate() {
            let half = extracellular_half(points, index);
            let (_, line) = AxisLine::fit(
                &half,
                false,
                &format!("extracellular half of helix {}", index + 1),
            )?;
            stacked.extend(line.centered_at(&centroid(points)).points());
        }
        stacked
    } else {
        reduced.concat()
    };

    let (global, global_line) = AxisLine::fit(&bundle_points, false, "bundle axis")?;

    Ok(BundleAxes {
        helix_axes,
        helix_lines,
        global,
        global_line,
    })
}
