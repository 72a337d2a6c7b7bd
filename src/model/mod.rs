//! Core data structures modeling receptor structures.
//!
//! This module defines the types for atoms, residues, chains, and structures together with
//! the generic-number label that lets residues be compared across receptors. These types are
//! produced by the PDB reader, filtered and measured by the angle pipeline, and re-keyed by
//! the GPCRDB atom tables consumed during homology alignment.

pub mod atom;
pub mod chain;
pub mod generic;
pub mod grid;
pub mod residue;
pub mod structure;
pub mod types;
