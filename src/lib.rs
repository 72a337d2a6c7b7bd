//! # GPCR Forge
//!
//! **GPCR Forge** is a pure-Rust analysis engine for G protein-coupled receptor structures. It
//! measures how each transmembrane residue sits relative to the seven-helix bundle, scores those
//! measurements against the population of solved structures, and prepares reference/template
//! alignments for homology modeling with bulge, constriction, and non-conserved residue handling.
//!
//! ## Features
//!
//! - **Generic-number aware model** – `Atom`, `Residue`, `Chain`, and `Structure` types backed by
//!   `nalgebra`, plus a typed [`GenericNumber`] replacing stringly `1x50`/`1.50` labels.
//! - **Helix-angle pipeline** – principal-component helix axes, a bundle-wide reference axis,
//!   bend and tilt angles, SASA, half-sphere exposure, and per-state medians and significance
//!   live under `ops`.
//! - **Homology alignment pipeline** – similarity ranking, reference/template alignment,
//!   gap-anomaly resolution, and non-conserved residue switching live under `homology`.
//! - **Legacy interchange formats** – PDB, GPCRDB-indexed PDB files whose generic numbers travel
//!   in the B-factor column, and PIR alignment files.
//! - **Catalog-backed data access** – a TOML catalog of proteins, residues, and structures stands
//!   in for the relational store the pipelines read from.

mod model;
mod utils;

pub mod db;
pub mod homology;
pub mod io;
pub mod ops;

pub use model::atom::Atom;
pub use model::chain::Chain;
pub use model::generic::GenericNumber;
pub use model::residue::{Residue, ResidueKey};
pub use model::structure::Structure;
pub use model::types::{ConformationState, Element, Point, ResidueCategory, StandardResidue};
