//! Cache of GPCRDB-indexed atom tables for candidate templates.

use crate::db::StructureEntry;
use crate::io::{self, GpcrdbAtomTable, IoContext, table_path};
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Lazily loaded GPCRDB atom tables of candidate template structures.
///
/// Each table is read at most once per run; structures whose file is missing or unreadable
/// are remembered as unavailable so later scans skip them without touching the disk again.
#[derive(Debug)]
pub struct TemplateLibrary {
    pdb_dir: PathBuf,
    context: IoContext,
    tables: HashMap<(String, char), Option<GpcrdbAtomTable>>,
}

impl TemplateLibrary {
    pub fn new(pdb_dir: impl Into<PathBuf>) -> Self {
        Self {
            pdb_dir: pdb_dir.into(),
            context: IoContext::default(),
            tables: HashMap::new(),
        }
    }

    pub fn pdb_dir(&self) -> &Path {
        &self.pdb_dir
    }

    /// Path of the GPCRDB-indexed file for a structure's template chain.
    pub fn path_of(&self, structure: &StructureEntry) -> PathBuf {
        table_path(&self.pdb_dir, &structure.pdb_code, structure.template_chain())
    }

    /// Reads a structure's table without caching it.
    pub fn load(&self, structure: &StructureEntry) -> Result<GpcrdbAtomTable, io::Error> {
        GpcrdbAtomTable::open(&self.path_of(structure), &self.context)
    }

    /// Cached table of a structure, or `None` if it cannot be read.
    pub fn table(&mut self, structure: &StructureEntry) -> Option<&GpcrdbAtomTable> {
        let key = (structure.pdb_code.clone(), structure.template_chain());
        if !self.tables.contains_key(&key) {
            let table = match self.load(structure) {
                Ok(table) => Some(table),
                Err(e) => {
                    debug!("Template {} unavailable: {}", structure.pdb_code, e);
                    None
                }
            };
            self.tables.insert(key.clone(), table);
        }
        self.tables.get(&key).and_then(Option::as_ref)
    }
}
