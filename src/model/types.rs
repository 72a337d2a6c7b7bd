use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type Point = Point3<f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    H,
    C,
    N,
    O,
    S,
    P,
    Se,
    Na,
    Mg,
    Cl,
    K,
    Ca,
    Fe,
    Zn,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardResidue {
    ALA,
    ARG,
    ASN,
    ASP,
    CYS,
    GLN,
    GLU,
    GLY,
    HIS,
    ILE,
    LEU,
    LYS,
    MET,
    PHE,
    PRO,
    SER,
    THR,
    TRP,
    TYR,
    VAL,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResidueCategory {
    Standard,
    Hetero,
    Ion,
}

/// Activation state assigned to a solved receptor structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConformationState {
    Inactive,
    Intermediate,
    Active,
    Other,
}

impl Element {
    pub fn symbol(&self) -> &'static str {
        match self {
            Element::H => "H",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::S => "S",
            Element::P => "P",
            Element::Se => "Se",
            Element::Na => "Na",
            Element::Mg => "Mg",
            Element::Cl => "Cl",
            Element::K => "K",
            Element::Ca => "Ca",
            Element::Fe => "Fe",
            Element::Zn => "Zn",
            Element::Unknown => "Unknown",
        }
    }

    pub fn is_heavy_atom(&self) -> bool {
        !matches!(self, Element::H)
    }

    /// Van der Waals radius in ångströms used for solvent-accessible surface sampling.
    pub fn vdw_radius(&self) -> f64 {
        match self {
            Element::H => 1.10,
            Element::C => 1.70,
            Element::N => 1.55,
            Element::O => 1.52,
            Element::S => 1.80,
            Element::P => 1.80,
            Element::Se => 1.90,
            Element::Na => 2.27,
            Element::Mg => 1.73,
            Element::Cl => 1.75,
            Element::K => 2.75,
            Element::Ca => 2.31,
            Element::Fe => 2.00,
            Element::Zn => 1.39,
            Element::Unknown => 1.80,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Element {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let normalized: String = match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(|c| c.to_lowercase()))
                .collect(),
            None => return Err("Empty element symbol".to_string()),
        };

        match normalized.as_str() {
            "H" | "D" => Ok(Element::H),
            "C" => Ok(Element::C),
            "N" => Ok(Element::N),
            "O" => Ok(Element::O),
            "S" => Ok(Element::S),
            "P" => Ok(Element::P),
            "Se" => Ok(Element::Se),
            "Na" => Ok(Element::Na),
            "Mg" => Ok(Element::Mg),
            "Cl" => Ok(Element::Cl),
            "K" => Ok(Element::K),
            "Ca" => Ok(Element::Ca),
            "Fe" => Ok(Element::Fe),
            "Zn" => Ok(Element::Zn),
            _ => Err(format!("Invalid element symbol: {}", s)),
        }
    }
}

impl StandardResidue {
    pub fn one_letter(&self) -> char {
        match self {
            StandardResidue::ALA => 'A',
            StandardResidue::ARG => 'R',
            StandardResidue::ASN => 'N',
            StandardResidue::ASP => 'D',
            StandardResidue::CYS => 'C',
            StandardResidue::GLN => 'Q',
            StandardResidue::GLU => 'E',
            StandardResidue::GLY => 'G',
            StandardResidue::HIS => 'H',
            StandardResidue::ILE => 'I',
            StandardResidue::LEU => 'L',
            StandardResidue::LYS => 'K',
            StandardResidue::MET => 'M',
            StandardResidue::PHE => 'F',
            StandardResidue::PRO => 'P',
            StandardResidue::SER => 'S',
            StandardResidue::THR => 'T',
            StandardResidue::TRP => 'W',
            StandardResidue::TYR => 'Y',
            StandardResidue::VAL => 'V',
        }
    }

    pub fn from_one_letter(code: char) -> Option<Self> {
        let residue = match code.to_ascii_uppercase() {
            'A' => StandardResidue::ALA,
            'R' => StandardResidue::ARG,
            'N' => StandardResidue::ASN,
            'D' => StandardResidue::ASP,
            'C' => StandardResidue::CYS,
            'Q' => StandardResidue::GLN,
            'E' => StandardResidue::GLU,
            'G' => StandardResidue::GLY,
            'H' => StandardResidue::HIS,
            'I' => StandardResidue::ILE,
            'L' => StandardResidue::LEU,
            'K' => StandardResidue::LYS,
            'M' => StandardResidue::MET,
            'F' => StandardResidue::PHE,
            'P' => StandardResidue::PRO,
            'S' => StandardResidue::SER,
            'T' => StandardResidue::THR,
            'W' => StandardResidue::TRP,
            'Y' => StandardResidue::TYR,
            'V' => StandardResidue::VAL,
            _ => return None,
        };
        Some(residue)
    }

    pub fn name(&self) -> &'static str {
        match self {
            StandardResidue::ALA => "ALA",
            StandardResidue::ARG => "ARG",
            StandardResidue::ASN => "ASN",
            StandardResidue::ASP => "ASP",
            StandardResidue::CYS => "CYS",
            StandardResidue::GLN => "GLN",
            StandardResidue::GLU => "GLU",
            StandardResidue::GLY => "GLY",
            StandardResidue::HIS => "HIS",
            StandardResidue::ILE => "ILE",
            StandardResidue::LEU => "LEU",
            StandardResidue::LYS => "LYS",
            StandardResidue::MET => "MET",
            StandardResidue::PHE => "PHE",
            StandardResidue::PRO => "PRO",
            StandardResidue::SER => "SER",
            StandardResidue::THR => "THR",
            StandardResidue::TRP => "TRP",
            StandardResidue::TYR => "TYR",
            StandardResidue::VAL => "VAL",
        }
    }
}

impl fmt::Display for StandardResidue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for StandardResidue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALA" => Ok(StandardResidue::ALA),
            "ARG" => Ok(StandardResidue::ARG),
            "ASN" => Ok(StandardResidue::ASN),
            "ASP" => Ok(StandardResidue::ASP),
            "CYS" => Ok(StandardResidue::CYS),
            "GLN" => Ok(StandardResidue::GLN),
            "GLU" => Ok(StandardResidue::GLU),
            "GLY" => Ok(StandardResidue::GLY),
            "HIS" => Ok(StandardResidue::HIS),
            "ILE" => Ok(StandardResidue::ILE),
            "LEU" => Ok(StandardResidue::LEU),
            "LYS" => Ok(StandardResidue::LYS),
            "MET" => Ok(StandardResidue::MET),
            "PHE" => Ok(StandardResidue::PHE),
            "PRO" => Ok(StandardResidue::PRO),
            "SER" => Ok(StandardResidue::SER),
            "THR" => Ok(StandardResidue::THR),
            "TRP" => Ok(StandardResidue::TRP),
            "TYR" => Ok(StandardResidue::TYR),
            "VAL" => Ok(StandardResidue::VAL),
            _ => Err(format!("Invalid standard residue name: {}", s)),
        }
    }
}

impl ResidueCategory {
    pub fn name(&self) -> &'static str {
        match self {
            ResidueCategory::Standard => "Standard Residue",
            ResidueCategory::Hetero => "Hetero Residue",
            ResidueCategory::Ion => "Ion",
        }
    }
}

impl fmt::Display for ResidueCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl ConformationState {
    pub const ALL: [ConformationState; 4] = [
        ConformationState::Inactive,
        ConformationState::Intermediate,
        ConformationState::Active,
        ConformationState::Other,
    ];

    /// Position of the state inside per-state arrays.
    pub fn index(&self) -> usize {
        match self {
            ConformationState::Inactive => 0,
            ConformationState::Intermediate => 1,
            ConformationState::Active => 2,
            ConformationState::Other => 3,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            ConformationState::Inactive => "inactive",
            ConformationState::Intermediate => "intermediate",
            ConformationState::Active => "active",
            ConformationState::Other => "other",
        }
    }
}

impl fmt::Display for ConformationState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for ConformationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inactive" => Ok(ConformationState::Inactive),
            "intermediate" => Ok(ConformationState::Intermediate),
            "active" => Ok(ConformationState::Active),
            "other" => Ok(ConformationState::Other),
            _ => Err(format!("Invalid conformation state: {}", s)),
        }
    }
}
