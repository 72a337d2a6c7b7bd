//! Readers and writers for the structure and alignment formats the pipelines exchange.
//!
//! PDB files feed the angle pipeline and the exposure calculations, GPCRDB-indexed PDB files
//! supply template residues keyed by generic number, and PIR files hand the final
//! reference/template alignment to downstream model builders.

mod bfactor;
mod context;
mod error;
mod gpcrdb;
mod pdb;
mod pir;

pub use pdb::reader::read as read_pdb_structure;
pub use pdb::writer::write_structure as write_pdb_structure;

pub use bfactor::{GENERIC_NUMBER_LIMIT, decode_generic_number, encode_generic_number};
pub use gpcrdb::{BACKBONE_ATOMS, BackboneIssue, GpcrdbAtomTable, TableKey, table_path};
pub use pir::{PirKind, PirRecord, write_pir};

pub use context::IoContext;

pub use error::Error;

use crate::model::structure::Structure;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Opens and parses a PDB file, tagging errors with its path.
pub fn read_pdb_file(path: &Path, context: &IoContext) -> Result<Structure, Error> {
    let file = File::open(path).map_err(|e| Error::from_io(e, Some(path.to_path_buf())))?;
    read_pdb_structure(BufReader::new(file), context).map_err(|e| e.with_path(path))
}
