use crate::model::types::ConformationState;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    #[serde(default, rename = "protein")]
    pub proteins: Vec<ProteinRecord>,
    #[serde(default, rename = "structure")]
    pub structures: Vec<StructureRecord>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ProteinRecord {
    pub entry_name: String,
    pub accession: String,
    #[serde(default)]
    pub family: String,
    #[serde(default)]
    pub sequence: String,
    #[serde(default)]
    pub residues: Vec<ResidueRecord>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ResidueRecord {
    pub seq: i32,
    pub aa: char,
    #[serde(default)]
    pub gn: Option<String>,
    #[serde(default)]
    pub segment: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct StructureRecord {
    pub pdb_code: String,
    pub protein: String,
    pub preferred_chain: String,
    pub state: ConformationState,
    pub resolution: f64,
    pub pdb_file: PathBuf,
    #[serde(default)]
    pub refined: bool,
}
