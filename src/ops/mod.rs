//! Helix geometry and exposure measurements over solved receptor structures.
//!
//! The submodules build on one another: structures are filtered to their transmembrane
//! residues, helix and bundle axes are fitted by principal components, angles are measured in
//! the bundle frame, exposure is annotated, and finally each value is scored against the
//! population of structures in the same state. [`compute_helix_angles`] runs the whole chain
//! over a catalog.

mod angle;
mod axis;
mod error;
mod exposure;
mod filter;
mod helix_angles;
mod pca;
mod significance;

pub use filter::{
    HELIX_COUNT, HelixSelection, MAX_SEQUENCE_NUMBER, Roster, RosterEntry, filter_structure,
};

pub use pca::{AXIS_HALF_LENGTH, AxisLine, PrincipalAxes};

pub use axis::{
    BundleAxes, HelixTrace, build_axes, extracellular_half, helix_traces, pseudo_cb, smooth_trace,
};

pub use angle::{bend_angles, projected_angle, rolling_mean, round3, tilt_angles};

pub use exposure::{
    DEFAULT_HSE_RADIUS, DEFAULT_PROBE_RADIUS, DEFAULT_SPHERE_POINTS, HalfSphereExposure,
    half_sphere_exposure, peptides, residue_sasa, sphere_areas,
};

pub use significance::{
    UNDEFINED_SIGNIFICANCE, median, sample_std_dev, significance, student_t_cdf,
};

pub use helix_angles::{
    AngleBatch, AngleConfig, AngleKind, AngleRecord, FailedStructure, compute_helix_angles,
    measure_structure, sasa_path, score_records,
};

pub use error::Error;
