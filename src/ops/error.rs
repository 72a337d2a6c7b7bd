use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("structure '{pdb_code}' has no chain '{chain_id}'")]
    MissingChain { pdb_code: String, chain_id: String },

    #[error("protein '{entry_name}' of structure '{pdb_code}' is not in the catalog")]
    MissingProtein { pdb_code: String, entry_name: String },

    #[error("residue '{res_name}' ({res_id}) is missing atom '{atom_name}'")]
    MissingAtom {
        res_name: String,
        res_id: i32,
        atom_name: String,
    },

    #[error("{context}: principal axes need at least {required} points, found {found}")]
    InsufficientPoints {
        context: String,
        found: usize,
        required: usize,
    },

    #[error("degenerate geometry: {details}")]
    DegenerateGeometry { details: String },

    #[error("{series} series of structure '{pdb_code}' contains non-finite values")]
    NonFiniteExposure {
        pdb_code: String,
        series: &'static str,
    },

    #[error(transparent)]
    Io(#[from] crate::io::Error),
}

impl Error {
    pub fn missing_chain(pdb_code: impl Into<String>, chain_id: impl Into<String>) -> Self {
        Self::MissingChain {
            pdb_code: pdb_code.into(),
            chain_id: chain_id.into(),
        }
    }

    pub fn missing_atom(
        res_name: impl Into<String>,
        res_id: i32,
        atom_name: impl Into<String>,
    ) -> Self {
        Self::MissingAtom {
            res_name: res_name.into(),
            res_id,
            atom_name: atom_name.into(),
        }
    }

    pub fn insufficient_points(context: impl Into<String>, found: usize, required: usize) -> Self {
        Self::InsufficientPoints {
            context: context.into(),
            found,
            required,
        }
    }

    pub fn degenerate(details: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            details: details.into(),
        }
    }
}
