//! Catalog-backed access to receptors, residues, and structures.
//!
//! A TOML document lists `[[protein]]` entries with their generic-numbered residues and
//! `[[structure]]` entries pointing at PDB files. The schema is deserialized strictly and then
//! indexed into a read-only [`Catalog`] shared by both pipelines.

mod catalog;
mod loader;
mod schema;

pub use catalog::{Catalog, GenericNumberMap, Protein, ProteinResidue, StructureEntry};
pub use loader::{load_catalog, parse_catalog};
