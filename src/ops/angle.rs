//! Bend and tilt angles measured in the bundle-axis frame.
//!
//! Both angles share one construction: with `b` and `c` expressed in the bundle frame, the
//! vector from `b` to the bundle axis (its axial component dropped) is compared with the vector
//! from `b` to `c`.

use super::error::Error;
use super::pca::PrincipalAxes;
use crate::model::types::Point;
use nalgebra::Vector3;

/// Rounds to three decimals, the precision angle values are stored with.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Angle in degrees at `b` between the bundle axis and `c`.
///
/// `b` and `c` are bundle-frame coordinates whose first component runs along the axis.
///
/// # Errors
///
/// Returns [`Error::DegenerateGeometry`] when `b` lies on the axis or coincides with `c`.
pub fn projected_angle(b: &Vector3<f64>, c: &Vector3<f64>) -> Result<f64, Error> {
    let to_axis = Vector3::new(0.0, -b.y, -b.z);
    let to_target = c - b;

    let norms = to_axis.norm() * to_target.norm();
    if !(norms > f64::EPSILON) {
        return Err(Error::degenerate(format!(
            "zero-length vector in angle at {:?}",
            b.as_slice()
        )));
    }

    let cosine = (to_axis.dot(&to_target) / norms).clamp(-1.0, 1.0);
    Ok(cosine.acos().to_degrees())
}

/// Axis→CA→CB angle for every residue of a helix.
pub fn bend_angles(ca: &[Point], cb: &[Point], global: &PrincipalAxes) -> Result<Vec<f64>, Error> {
    ca.iter()
        .zip(cb)
        .map(|(ca, cb)| {
            projected_angle(&global.transform(ca), &global.transform(cb)).map(round3)
        })
        .collect()
}

/// Mean of each point with its neighbours; the first and last points stand in for the
/// missing neighbour at either end.
pub fn rolling_mean(points: &[Point]) -> Vec<Point> {
    let last = points.len().saturating_sub(1);
    (0..points.len())
        .map(|i| {
            let prev = points[i.saturating_sub(1)].coords;
            let next = points[(i + 1).min(last)].coords;
            Point::from((prev + points[i].coords + next) / 3.0)
        })
        .collect()
}

/// Axis→axis→CA angle for every residue of a helix.
///
/// Each CA is projected onto its helix axis, with the off-axis components taken from the
/// rolling mean of three consecutive CAs. The angle at that projection between the bundle
/// axis and the CA is reported.
pub fn tilt_angles(
    ca: &[Point],
    helix: &PrincipalAxes,
    global: &PrincipalAxes,
) -> Result<Vec<f64>, Error> {
    let smoothed = rolling_mean(ca);
    ca.iter()
        .zip(&smoothed)
        .map(|(point, mean)| {
            let mut local = helix.transform(point);
            let local_mean = helix.transform(mean);
            local.y = local_mean.y;
            local.z = local_mean.z;
            let projection = helix.inverse_transform(&local);
            projected_angle(&global.transform(&projection), &global.transform(point)).map(round3)
        })
        .collect()
}
