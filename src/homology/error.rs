use crate::model::types::ConformationState;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("protein '{entry_name}' is not in the catalog")]
    UnknownProtein { entry_name: String },

    #[error("no template structures for '{entry_name}' in states {states:?}")]
    NoTemplates {
        entry_name: String,
        states: Vec<ConformationState>,
    },

    #[error("main template '{pdb_code}' could not be loaded: {source}")]
    MainTemplateUnavailable {
        pdb_code: String,
        #[source]
        source: crate::io::Error,
    },

    #[error("models have different atom counts ({first} vs {second})")]
    AtomCountMismatch { first: usize, second: usize },

    #[error("model '{}' contains no atoms", path.display())]
    EmptyModel { path: PathBuf },

    #[error(transparent)]
    Io(#[from] crate::io::Error),
}

impl Error {
    pub fn unknown_protein(entry_name: impl Into<String>) -> Self {
        Self::UnknownProtein {
            entry_name: entry_name.into(),
        }
    }
}
