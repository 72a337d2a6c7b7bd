use crate::model::types::StandardResidue;
use std::collections::HashMap;

/// Residue-name resolution shared by the structure readers.
///
/// Maps protonation variants and common modified amino acids found in receptor crystal
/// structures onto their parent residue so that one-letter codes and side-chain atoms stay
/// comparable across templates.
#[derive(Debug, Clone)]
pub struct IoContext {
    alias_map: HashMap<String, String>,
    standard_map: HashMap<String, StandardResidue>,
}

impl IoContext {
    pub fn new_default() -> Self {
        let mut alias_map = HashMap::new();
        let mut standard_map = HashMap::new();

        macro_rules! register_standard {
            ($canonical:expr, $enum_val:expr) => {
                alias_map.insert($canonical.to_string(), $canonical.to_string());
                standard_map.insert($canonical.to_string(), $enum_val);
            };
        }

        macro_rules! register_alias {
            ($alias:expr, $canonical:expr) => {
                alias_map.insert($alias.to_string(), $canonical.to_string());
            };
        }

        register_standard!("ALA", StandardResidue::ALA);
        register_standard!("ARG", StandardResidue::ARG);
        register_standard!("ASN", StandardResidue::ASN);
        register_standard!("ASP", StandardResidue::ASP);
        register_standard!("CYS", StandardResidue::CYS);
        register_standard!("GLN", StandardResidue::GLN);
        register_standard!("GLU", StandardResidue::GLU);
        register_standard!("GLY", StandardResidue::GLY);
        register_standard!("HIS", StandardResidue::HIS);
        register_standard!("ILE", StandardResidue::ILE);
        register_standard!("LEU", StandardResidue::LEU);
        register_standard!("LYS", StandardResidue::LYS);
        register_standard!("MET", StandardResidue::MET);
        register_standard!("PHE", StandardResidue::PHE);
        register_standard!("PRO", StandardResidue::PRO);
        register_standard!("SER", StandardResidue::SER);
        register_standard!("THR", StandardResidue::THR);
        register_standard!("TRP", StandardResidue::TRP);
        register_standard!("TYR", StandardResidue::TYR);
        register_standard!("VAL", StandardResidue::VAL);

        register_alias!("ARN", "ARG");
        register_alias!("ASH", "ASP");
        register_alias!("CYM", "CYS");
        register_alias!("CYX", "CYS");
        register_alias!("GLH", "GLU");
        register_alias!("HID", "HIS");
        register_alias!("HIE", "HIS");
        register_alias!("HIP", "HIS");
        register_alias!("HSD", "HIS");
        register_alias!("HSE", "HIS");
        register_alias!("HSP", "HIS");
        register_alias!("LYN", "LYS");
        register_alias!("TYM", "TYR");

        register_alias!("CSO", "CYS");
        register_alias!("CME", "CYS");
        register_alias!("OCS", "CYS");
        register_alias!("MSE", "MET");
        register_alias!("FME", "MET");
        register_alias!("SEP", "SER");
        register_alias!("TPO", "THR");
        register_alias!("PTR", "TYR");
        register_alias!("TYS", "TYR");
        register_alias!("MLY", "LYS");
        register_alias!("ALY", "LYS");
        register_alias!("KCX", "LYS");
        register_alias!("HYP", "PRO");
        register_alias!("PCA", "GLU");
        register_alias!("CGU", "GLU");
        register_alias!("NLE", "LEU");

        Self {
            alias_map,
            standard_map,
        }
    }

    pub fn resolve_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.alias_map.get(name).map(|s| s.as_str()).unwrap_or(name)
    }

    pub fn map_to_standard(&self, name: &str) -> Option<StandardResidue> {
        self.standard_map.get(name).copied()
    }

    pub fn add_alias(&mut self, alias: impl Into<String>, canonical: impl Into<String>) {
        self.alias_map.insert(alias.into(), canonical.into());
    }

    pub fn classify_residue(&self, raw_name: &str) -> (String, Option<StandardResidue>) {
        let canonical = self.resolve_name(raw_name);
        let standard = self.map_to_standard(canonical);
        (canonical.to_string(), standard)
    }
}

impl Default for IoContext {
    fn default() -> Self {
        Self::new_default()
    }
}
