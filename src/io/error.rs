use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading or writing structure, catalog, and alignment files.
///
/// Readers work on anonymous streams; the file-level helpers attach the path afterwards with
/// [`Error::with_path`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error for {}: {source}", Source(path))]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {format} {}: {details} (line {line_number})", Source(path))]
    Parse {
        format: &'static str,
        path: Option<PathBuf>,
        line_number: usize,
        details: String,
    },

    #[error("unknown standard residue name '{name}' in {}", Source(path))]
    UnknownStandardResidue { name: String, path: Option<PathBuf> },

    #[error("inconsistent data in {format} {}: {details}", Source(path))]
    InconsistentData {
        format: &'static str,
        path: Option<PathBuf>,
        details: String,
    },

    /// No CA B-factor in the file decodes to a generic number.
    #[error("{} carries no generic-number index", Source(path))]
    Unindexed { path: Option<PathBuf> },
}

impl Error {
    pub fn from_io(source: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::Io { path, source }
    }

    pub fn parse(
        format: &'static str,
        path: Option<PathBuf>,
        line_number: usize,
        details: impl Into<String>,
    ) -> Self {
        Self::Parse {
            format,
            path,
            line_number,
            details: details.into(),
        }
    }

    pub fn unknown_standard_residue(name: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::UnknownStandardResidue {
            name: name.into(),
            path,
        }
    }

    pub fn inconsistent_data(
        format: &'static str,
        path: Option<PathBuf>,
        details: impl Into<String>,
    ) -> Self {
        Self::InconsistentData {
            format,
            path,
            details: details.into(),
        }
    }

    /// Fills in the file path of an error raised on a stream; a path already set is kept.
    pub fn with_path(mut self, file: impl Into<PathBuf>) -> Self {
        let slot = match &mut self {
            Self::Io { path, .. }
            | Self::Parse { path, .. }
            | Self::UnknownStandardResidue { path, .. }
            | Self::InconsistentData { path, .. }
            | Self::Unindexed { path } => path,
        };
        if slot.is_none() {
            *slot = Some(file.into());
        }
        self
    }
}

struct Source<'a>(&'a Option<PathBuf>);

impl fmt::Display for Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(p) => write!(f, "file '{}'", p.display()),
            None => f.write_str("stream source"),
        }
    }
}
