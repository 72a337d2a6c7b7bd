use std::f64::consts::TAU;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::path::Path;

use gpcr_forge::db::parse_catalog;
use gpcr_forge::io::write_pdb_structure;
use gpcr_forge::ops::{AngleConfig, HELIX_COUNT, UNDEFINED_SIGNIFICANCE, compute_helix_angles, sasa_path};
use gpcr_forge::{
    Atom, Chain, ConformationState, Element, Point, Residue, ResidueCategory, StandardResidue,
    Structure,
};

const RESIDUES_PER_HELIX: usize = 24;

fn sequence_number(helix: usize, index: usize) -> i32 {
    (100 * (helix + 1) + index) as i32
}

/// Seven ideal helices on a ring, alternating direction like a receptor bundle.
fn bundle() -> Structure {
    let mut chain = Chain::new("A");
    for helix in 0..HELIX_COUNT {
        let ring = helix as f64 * TAU / HELIX_COUNT as f64;
        let (cx, cy) = (10.0 * ring.cos(), 10.0 * ring.sin());
        for index in 0..RESIDUES_PER_HELIX {
            let step = if helix % 2 == 0 {
                index
            } else {
                RESIDUES_PER_HELIX - 1 - index
            };
            let phase = index as f64 * 100f64.to_radians();
            let z = 1.5 * step as f64;
            let at = |radius: f64, offset: f64, dz: f64| {
                Point::new(
                    cx + radius * (phase + offset).cos(),
                    cy + radius * (phase + offset).sin(),
                    z + dz,
                )
            };

            let mut residue = Residue::new(
                sequence_number(helix, index),
                None,
                "ALA",
                Some(StandardResidue::ALA),
                ResidueCategory::Standard,
            );
            residue.add_atom(Atom::new("N", Element::N, at(1.6, -0.5, -0.9)));
            residue.add_atom(Atom::new("CA", Element::C, at(2.3, 0.0, 0.0)));
            residue.add_atom(Atom::new("C", Element::C, at(1.7, 0.5, 0.9)));
            residue.add_atom(Atom::new("O", Element::O, at(1.9, 0.6, 2.1)));
            residue.add_atom(Atom::new("CB", Element::C, at(3.8, 0.0, 0.3)));
            chain.add_residue(residue);
        }
    }
    let mut structure = Structure::new();
    structure.add_chain(chain);
    structure
}

fn residue_table() -> String {
    let mut table = String::from("residues = [\n");
    for helix in 0..HELIX_COUNT {
        for index in 0..RESIDUES_PER_HELIX {
            writeln!(
                table,
                "    {{ seq = {}, aa = \"A\", gn = \"{}x{}\" }},",
                sequence_number(helix, index),
                helix + 1,
                30 + index
            )
            .unwrap();
        }
    }
    table.push_str("]\n");
    table
}

fn catalog_toml() -> String {
    format!(
        r#"
[[protein]]
entry_name = "bundle_human"
accession = "P10000"
family = "001_001_001_001"
{residues}
[[protein]]
entry_name = "other_human"
accession = "P20000"
family = "004_001_001_001"
{residues}
[[structure]]
pdb_code = "1BUN"
protein = "bundle_human"
preferred_chain = "A"
state = "Inactive"
resolution = 2.0
pdb_file = "pdb/bundle.pdb"

[[structure]]
pdb_code = "2BUN"
protein = "bundle_human"
preferred_chain = "A"
state = "Inactive"
resolution = 2.4
pdb_file = "pdb/bundle.pdb"

[[structure]]
pdb_code = "3BUN"
protein = "bundle_human"
preferred_chain = "A"
state = "Active"
resolution = 3.0
pdb_file = "pdb/missing.pdb"

[[structure]]
pdb_code = "4OTH"
protein = "other_human"
preferred_chain = "A"
state = "Inactive"
resolution = 2.0
pdb_file = "pdb/bundle.pdb"
"#,
        residues = residue_table()
    )
}

fn write_structure(path: &Path, structure: &Structure) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    write_pdb_structure(File::create(path).unwrap(), structure).unwrap();
}

#[test]
fn helix_angles_cover_reference_structures_and_report_failures() {
    let dir = tempfile::tempdir().unwrap();
    let structure = bundle();
    let sasa_dir = dir.path().join("sasa");
    write_structure(&dir.path().join("pdb/bundle.pdb"), &structure);
    write_structure(&sasa_path(&sasa_dir, "1BUN"), &structure);
    write_structure(&sasa_path(&sasa_dir, "2BUN"), &structure);

    let catalog = parse_catalog(&catalog_toml(), Some(dir.path())).unwrap();
    let config = AngleConfig {
        sasa_dir,
        sphere_points: 120,
        ..AngleConfig::default()
    };
    let batch = compute_helix_angles(&catalog, &config);

    assert_eq!(batch.failed.len(), 1);
    assert_eq!(batch.failed[0].pdb_code, "3BUN");
    assert!(!batch.failed[0].reason.is_empty());

    assert_eq!(batch.structure_count(), 2);
    assert!(batch.for_structure("4OTH").is_empty());

    let first = batch.for_structure("1bun");
    assert_eq!(first.len(), HELIX_COUNT * RESIDUES_PER_HELIX);
    assert_eq!(first[0].generic_number.to_string(), "1x30");
    assert_eq!(first[0].sequence_number, 100);

    for record in &batch.records {
        assert_eq!(record.state, ConformationState::Inactive);
        assert!((0.0..=180.0).contains(&record.bend), "bend {}", record.bend);
        assert!((0.0..=180.0).contains(&record.tilt), "tilt {}", record.tilt);
        assert!(record.sasa >= 0.0);
        // Both structures share coordinates, so every population has zero spread.
        assert!(record.diff_median.abs() < 1e-9);
        assert_eq!(record.significance, UNDEFINED_SIGNIFICANCE);
    }

    let second = batch.for_structure("2BUN");
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.generic_number, b.generic_number);
        assert_eq!(a.bend, b.bend);
        assert_eq!(a.hse, b.hse);
    }
}

#[test]
fn helix_angles_fail_without_surface_file() {
    let dir = tempfile::tempdir().unwrap();
    write_structure(&dir.path().join("pdb/bundle.pdb"), &bundle());

    let catalog = parse_catalog(&catalog_toml(), Some(dir.path())).unwrap();
    let config = AngleConfig {
        sasa_dir: dir.path().join("empty"),
        sphere_points: 60,
        ..AngleConfig::default()
    };
    let batch = compute_helix_angles(&catalog, &config);

    assert!(batch.records.is_empty());
    let mut failed: Vec<&str> = batch.failed.iter().map(|f| f.pdb_code.as_str()).collect();
    failed.sort_unstable();
    assert_eq!(failed, vec!["1BUN", "2BUN", "3BUN"]);
}
