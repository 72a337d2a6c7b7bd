//! Fundamental atom representation comprising name, chemical element, position, and B-factor.
//!
//! Atoms are instantiated by the PDB reader, measured by the angle pipeline, and re-emitted by
//! the writer. The B-factor column is carried verbatim because GPCRDB-indexed files reuse it to
//! transport generic numbers.

use super::types::{Element, Point};
use smol_str::SmolStr;
use std::fmt;

/// Labeled atom with element identity, position, and temperature factor.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Atom name as it appears in crystallographic files (e.g., `CA`).
    pub name: SmolStr,
    /// Chemical element derived from the element column or the atom name.
    pub element: Element,
    /// Cartesian coordinates measured in ångströms.
    pub pos: Point,
    /// Temperature factor column; GPCRDB files store an encoded generic number here.
    pub b_factor: f64,
}

impl Atom {
    /// Creates a new atom with a zero B-factor.
    ///
    /// # Arguments
    ///
    /// * `name` - Atom label such as `"CA"` or `"OXT"`.
    /// * `element` - `Element` variant describing the chemical identity.
    /// * `pos` - `Point` describing the Cartesian coordinates in ångströms.
    ///
    /// # Returns
    ///
    /// A fully initialized `Atom` instance.
    pub fn new(name: &str, element: Element, pos: Point) -> Self {
        Self {
            name: SmolStr::new(name),
            element,
            pos,
            b_factor: 0.0,
        }
    }

    /// Returns the atom with its B-factor replaced.
    pub fn with_b_factor(mut self, b_factor: f64) -> Self {
        self.b_factor = b_factor;
        self
    }

    /// Computes the squared Euclidean distance to another atom.
    pub fn distance_squared(&self, other: &Atom) -> f64 {
        nalgebra::distance_squared(&self.pos, &other.pos)
    }

    /// Computes the Euclidean distance to another atom in ångströms.
    pub fn distance(&self, other: &Atom) -> f64 {
        nalgebra::distance(&self.pos, &other.pos)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Atom {{ name: \"{}\", element: {}, pos: [{:.3}, {:.3}, {:.3}], b: {:.2} }}",
            self.name, self.element, self.pos.x, self.pos.y, self.pos.z, self.b_factor
        )
    }
}
