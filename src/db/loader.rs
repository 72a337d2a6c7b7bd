use super::catalog::{Catalog, Protein, ProteinResidue, StructureEntry};
use super::schema::{CatalogFile, ProteinRecord, StructureRecord};
use crate::io::Error;
use crate::model::generic::GenericNumber;
use std::fs;
use std::path::Path;

/// Reads a TOML catalog from disk.
///
/// Relative `pdb_file` paths resolve against the directory that holds the catalog.
pub fn load_catalog(path: &Path) -> Result<Catalog, Error> {
    let content =
        fs::read_to_string(path).map_err(|e| Error::from_io(e, Some(path.to_path_buf())))?;
    parse_catalog(&content, path.parent()).map_err(|e| e.with_path(path))
}

/// Parses a TOML catalog, resolving relative structure paths against `base_dir`.
pub fn parse_catalog(content: &str, base_dir: Option<&Path>) -> Result<Catalog, Error> {
    let schema: CatalogFile = toml::from_str(content).map_err(|e| {
        let line_number = e
            .span()
            .map(|span| content[..span.start].matches('\n').count() + 1)
            .unwrap_or(0);
        Error::parse("TOML", None, line_number, e.message())
    })?;

    let proteins = schema
        .proteins
        .into_iter()
        .map(convert_protein)
        .collect::<Result<Vec<_>, _>>()?;

    let structures = schema
        .structures
        .into_iter()
        .map(|record| convert_structure(record, base_dir))
        .collect();

    Catalog::new(proteins, structures)
}

fn convert_protein(record: ProteinRecord) -> Result<Protein, Error> {
    let residues = record
        .residues
        .into_iter()
        .map(|r| {
            let generic_number = r
                .gn
                .as_deref()
                .map(str::parse::<GenericNumber>)
                .transpose()
                .map_err(|e| {
                    Error::inconsistent_data(
                        "catalog",
                        None,
                        format!("protein '{}', residue {}: {}", record.entry_name, r.seq, e),
                    )
                })?;
            let segment = r.segment.or_else(|| generic_number.and_then(default_segment));
            Ok(ProteinResidue {
                sequence_number: r.seq,
                amino_acid: r.aa.to_ascii_uppercase(),
                generic_number,
                segment,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(Protein::new(
        record.entry_name,
        record.accession,
        record.family,
        record.sequence,
        residues,
    ))
}

fn convert_structure(record: StructureRecord, base_dir: Option<&Path>) -> StructureEntry {
    let pdb_file = match base_dir {
        Some(dir) if record.pdb_file.is_relative() => dir.join(&record.pdb_file),
        _ => record.pdb_file,
    };
    StructureEntry {
        pdb_code: record.pdb_code,
        protein: record.protein,
        preferred_chain: record.preferred_chain,
        state: record.state,
        resolution: record.resolution,
        pdb_file,
        refined: record.refined,
    }
}

fn default_segment(gn: GenericNumber) -> Option<String> {
    match gn.helix() {
        1..=7 => Some(format!("TM{}", gn.helix())),
        8 => Some("H8".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::ConformationState;
    use std::path::PathBuf;

    const CATALOG: &str = r#"
[[protein]]
entry_name = "oprm_mouse"
accession = "P42866"
family = "001_002_022_003"
residues = [
    { seq = 64, aa = "m", gn = "1x28" },
    { seq = 65, aa = "L", gn = "1x29" },
    { seq = 120, aa = "N", gn = "2x50", segment = "TM2" },
    { seq = 200, aa = "G" },
]

[[structure]]
pdb_code = "4DKL"
protein = "oprm_mouse"
preferred_chain = "A"
state = "Inactive"
resolution = 2.8
pdb_file = "pdb/4dkl.pdb"
"#;

    #[test]
    fn parse_catalog_builds_proteins_and_structures() {
        let catalog = parse_catalog(CATALOG, Some(Path::new("/data"))).unwrap();

        let protein = catalog.protein("oprm_mouse").unwrap();
        assert_eq!(protein.sequence, "MLNG");
        assert_eq!(protein.residues()[0].segment.as_deref(), Some("TM1"));
        assert_eq!(protein.residues()[3].segment, None);

        let structure = catalog.structure("4DKL").unwrap();
        assert_eq!(structure.state, ConformationState::Inactive);
        assert_eq!(structure.pdb_file, PathBuf::from("/data/pdb/4dkl.pdb"));
        assert!(!structure.refined);
    }

    #[test]
    fn parse_catalog_rejects_unknown_fields_with_line() {
        let content = "[[protein]]\nentry_name = \"a\"\naccession = \"b\"\ncolour = \"red\"\n";
        match parse_catalog(content, None) {
            Err(Error::Parse { line_number, .. }) => assert!(line_number >= 1),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn parse_catalog_rejects_malformed_generic_numbers() {
        let content = r#"
[[protein]]
entry_name = "a"
accession = "b"
residues = [{ seq = 1, aa = "A", gn = "1x5" }]
"#;
        assert!(matches!(
            parse_catalog(content, None),
            Err(Error::InconsistentData { .. })
        ));
    }

    #[test]
    fn load_catalog_reports_missing_file() {
        let result = load_catalog(Path::new("/nonexistent/catalog.toml"));
        assert!(matches!(result, Err(Error::Io { path: Some(_), .. })));
    }
}
