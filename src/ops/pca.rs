//! Principal-component fits of helix traces.
//!
//! [`PrincipalAxes`] is a full three-component PCA: it centers points on their mean and rotates
//! them into the eigenbasis of the covariance matrix, largest variance first. [`AxisLine`]
//! turns the first component into an oriented segment through the fitted points.

use super::error::Error;
use crate::model::types::Point;
use nalgebra::{Matrix3, SymmetricEigen, Vector3};

/// Half-length of an axis segment along the first principal component, in Å.
pub const AXIS_HALF_LENGTH: f64 = 20.0;

/// Mean and orthonormal principal directions of a point cloud.
///
/// Rows of `components` are the principal directions sorted by decreasing variance.
#[derive(Debug, Clone, PartialEq)]
pub struct PrincipalAxes {
    mean: Vector3<f64>,
    components: Matrix3<f64>,
    variances: Vector3<f64>,
}

impl PrincipalAxes {
    /// Minimum number of points a fit accepts.
    pub const MIN_POINTS: usize = 3;

    /// Fits principal axes to `points`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientPoints`] for fewer than [`Self::MIN_POINTS`] points and
    /// [`Error::DegenerateGeometry`] when all points coincide or are not finite.
    pub fn fit(points: &[Point], context: &str) -> Result<Self, Error> {
        if points.len() < Self::MIN_POINTS {
            return Err(Error::insufficient_points(
                context,
                points.len(),
                Self::MIN_POINTS,
            ));
        }

        let n = points.len() as f64;
        let mean = points.iter().map(|p| p.coords).sum::<Vector3<f64>>() / n;

        let mut covariance = Matrix3::zeros();
        for p in points {
            let d = p.coords - mean;
            covariance += d * d.transpose();
        }
        covariance /= n - 1.0;

        if !covariance.iter().all(|v| v.is_finite()) {
            return Err(Error::degenerate(format!("{context}: non-finite coordinates")));
        }

        let eigen = SymmetricEigen::new(covariance);
        let mut order = [0usize, 1, 2];
        order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

        if eigen.eigenvalues[order[0]] <= f64::EPSILON {
            return Err(Error::degenerate(format!("{context}: points coincide")));
        }

        let mut components = Matrix3::zeros();
        let mut variances = Vector3::zeros();
        for (row, &col) in order.iter().enumerate() {
            components.set_row(row, &eigen.eigenvectors.column(col).transpose());
            variances[row] = eigen.eigenvalues[col].max(0.0);
        }

        Ok(Self {
            mean,
            components,
            variances,
        })
    }

    /// Coordinates of `point` in the principal frame.
    pub fn transform(&self, point: &Point) -> Vector3<f64> {
        self.components * (point.coords - self.mean)
    }

    /// World position of principal-frame coordinates.
    pub fn inverse_transform(&self, coords: &Vector3<f64>) -> Point {
        Point::from(self.components.transpose() * coords + self.mean)
    }

    pub fn mean(&self) -> Point {
        Point::from(self.mean)
    }

    /// Unit vector of the largest-variance direction.
    pub fn first_component(&self) -> Vector3<f64> {
        self.components.row(0).transpose()
    }

    pub fn explained_variance(&self) -> &Vector3<f64> {
        &self.variances
    }
}

/// Oriented segment along the first principal component of a point cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLine {
    pub start: Point,
    pub end: Point,
}

impl AxisLine {
    /// Fits a line through `points` and orients it.
    ///
    /// The segment spans the mean ± [`AXIS_HALF_LENGTH`] along the first component. The start
    /// lies on the same side as `points[0]`, or on the opposite side when `invert` is set.
    ///
    /// # Returns
    ///
    /// The fitted axes together with the oriented line.
    pub fn fit(
        points: &[Point],
        invert: bool,
        context: &str,
    ) -> Result<(PrincipalAxes, Self), Error> {
        let axes = PrincipalAxes::fit(points, context)?;
        let first_is_negative = axes.transform(&points[0]).x < 0.0;
        let start_negative = first_is_negative != invert;

        let along = |t: f64| axes.inverse_transform(&Vector3::new(t, 0.0, 0.0));
        let line = if start_negative {
            Self {
                start: along(-AXIS_HALF_LENGTH),
                end: along(AXIS_HALF_LENGTH),
            }
        } else {
            Self {
                start: along(AXIS_HALF_LENGTH),
                end: along(-AXIS_HALF_LENGTH),
            }
        };
        Ok((axes, line))
    }

    pub fn midpoint(&self) -> Point {
        nalgebra::center(&self.start, &self.end)
    }

    pub fn direction(&self) -> Vector3<f64> {
        (self.end - self.start).normalize()
    }

    /// Returns the line shifted so its midpoint sits at `target`.
    pub fn centered_at(&self, target: &Point) -> Self {
        let shift = target - self.midpoint();
        Self {
            start: self.start + shift,
            end: self.end + shift,
        }
    }

    pub fn points(&self) -> [Point; 2] {
        [self.start, self.end]
    }
}
