//! Reference/template alignment for GPCR homology modeling.
//!
//! A receptor without a solved structure is modeled on the most similar solved receptor in
//! the requested conformation state. The pieces run in order: [`SimilarityTable`] ranks
//! candidate templates, [`MainAlignment`] lines the reference up with the best one by generic
//! number, [`resolve_anomalies`] repairs bulges and constrictions using other templates, and
//! [`switch_non_conserved`] swaps in residues confirmed by homologous structures.
//! [`HomologyModeler`] drives the whole sequence and produces the PIR alignment and run
//! statistics.

mod aligner;
mod anomaly;
mod engine;
mod error;
mod library;
mod modeler;
mod similarity;
mod statistics;
mod switcher;

pub mod validation;

#[cfg(test)]
mod fixtures;

pub use engine::{
    AlignedProtein, Alignment, SegmentColumns, Slot, TRANSMEMBRANE_SEGMENTS, blosum62,
};

pub use similarity::{SimilarityEntry, SimilarityTable};

pub use aligner::{
    AlignedPosition, AlignmentKey, AlignmentWarning, GapKind, MainAlignment, SegmentPair,
};

pub use anomaly::{
    Anomaly, AnomalyKind, AnomalyRecord, AnomalyReport, AnomalySwitches, find_anomalies,
    resolve_anomalies,
};

pub use switcher::{NonConservedTemplate, SwitchOutcome, switch_non_conserved};

pub use library::TemplateLibrary;
pub use statistics::ModelStatistics;

pub use modeler::{HomologyConfig, HomologyModel, HomologyModeler};

pub use error::Error;
