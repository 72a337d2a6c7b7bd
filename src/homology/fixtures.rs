use crate::db::{Catalog, Protein, ProteinResidue, StructureEntry};
use crate::io::{encode_generic_number, table_path, write_pdb_structure};
use crate::model::atom::Atom;
use crate::model::chain::Chain;
use crate::model::generic::GenericNumber;
use crate::model::residue::Residue;
use crate::model::structure::Structure;
use crate::model::types::{ConformationState, Element, Point, ResidueCategory, StandardResidue};
use std::fs::File;
use std::path::{Path, PathBuf};

pub(crate) fn gn(label: &str) -> GenericNumber {
    label.parse().unwrap()
}

/// Protein whose residues are numbered from 1 and segmented by helix.
pub(crate) fn protein(name: &str, residues: &[(&str, char)]) -> Protein {
    let residues = residues
        .iter()
        .enumerate()
        .map(|(i, (label, aa))| {
            let gn = gn(label);
            ProteinResidue {
                sequence_number: i as i32 + 1,
                amino_acid: *aa,
                generic_number: Some(gn),
                segment: Some(format!("TM{}", gn.helix())),
            }
        })
        .collect();
    Protein::new(name, name.to_uppercase(), "001_001", "", residues)
}

pub(crate) fn structure(
    pdb_code: &str,
    protein: &str,
    state: ConformationState,
    resolution: f64,
) -> StructureEntry {
    StructureEntry {
        pdb_code: pdb_code.to_string(),
        protein: protein.to_string(),
        preferred_chain: "A".to_string(),
        state,
        resolution,
        pdb_file: PathBuf::from(format!("pdb/{}.pdb", pdb_code)),
        refined: false,
    }
}

pub(crate) fn catalog(proteins: Vec<Protein>, structures: Vec<StructureEntry>) -> Catalog {
    Catalog::new(proteins, structures).unwrap()
}

/// GPCRDB-style chain: backbone plus CB for every residue, CA B-factors carrying the label.
pub(crate) fn gpcrdb_chain(residues: &[(&str, char)]) -> Chain {
    let mut chain = Chain::new("A");
    for (i, (label, aa)) in residues.iter().enumerate() {
        let standard = StandardResidue::from_one_letter(*aa).unwrap();
        let b_factor = encode_generic_number(&gn(label)).unwrap();
        let mut residue = Residue::new(
            i as i32 + 1,
            None,
            standard.name(),
            Some(standard),
            ResidueCategory::Standard,
        );
        let x = 3.8 * i as f64;
        for (name, element, offset) in [
            ("N", Element::N, Point::new(x - 0.5, 1.3, 0.0)),
            ("CA", Element::C, Point::new(x, 0.0, 0.0)),
            ("C", Element::C, Point::new(x + 1.5, 0.0, 0.0)),
            ("O", Element::O, Point::new(x + 2.0, 1.0, 0.0)),
            ("CB", Element::C, Point::new(x, 0.0, 1.5)),
        ] {
            residue.add_atom(Atom::new(name, element, offset).with_b_factor(b_factor));
        }
        chain.add_residue(residue);
    }
    chain
}

/// Writes a GPCRDB-indexed file for chain `A` of `pdb_code` under `dir`.
pub(crate) fn write_table(dir: &Path, pdb_code: &str, residues: &[(&str, char)]) -> PathBuf {
    let path = table_path(dir, pdb_code, 'A');
    let mut structure = Structure::new();
    structure.add_chain(gpcrdb_chain(residues));
    write_pdb_structure(File::create(&path).unwrap(), &structure).unwrap();
    path
}
