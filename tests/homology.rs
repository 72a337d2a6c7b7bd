use std::fs::{self, File};
use std::path::Path;

use gpcr_forge::db::parse_catalog;
use gpcr_forge::homology::validation::pdb_rmsd;
use gpcr_forge::homology::{Error, HomologyConfig, HomologyModeler};
use gpcr_forge::io::{encode_generic_number, table_path, write_pdb_structure};
use gpcr_forge::{
    Atom, Chain, ConformationState, Element, GenericNumber, Point, Residue, ResidueCategory,
    StandardResidue, Structure,
};

const CATALOG: &str = r#"
[[protein]]
entry_name = "ref_human"
accession = "P00001"
family = "001_001_001_001"
residues = [
    { seq = 40, aa = "L", gn = "1x49" },
    { seq = 41, aa = "N", gn = "1x50" },
    { seq = 42, aa = "V", gn = "1x51" },
    { seq = 43, aa = "A", gn = "1x52" },
    { seq = 44, aa = "F", gn = "1x53" },
    { seq = 45, aa = "S", gn = "1x54" },
]

[[protein]]
entry_name = "tpl_human"
accession = "P00002"
family = "001_001_001_002"
residues = [
    { seq = 30, aa = "L", gn = "1x49" },
    { seq = 31, aa = "N", gn = "1x50" },
    { seq = 32, aa = "I", gn = "1x51" },
    { seq = 33, aa = "A", gn = "1x52" },
    { seq = 34, aa = "F", gn = "1x53" },
    { seq = 35, aa = "S", gn = "1x54" },
]

[[protein]]
entry_name = "hom_human"
accession = "P00003"
family = "001_001_002_001"
residues = [
    { seq = 50, aa = "M", gn = "1x49" },
    { seq = 51, aa = "D", gn = "1x50" },
    { seq = 52, aa = "V", gn = "1x51" },
    { seq = 53, aa = "G", gn = "1x52" },
    { seq = 54, aa = "Y", gn = "1x53" },
    { seq = 55, aa = "T", gn = "1x54" },
]

[[structure]]
pdb_code = "1TPL"
protein = "tpl_human"
preferred_chain = "A"
state = "Inactive"
resolution = 2.0
pdb_file = "pdb/1tpl.pdb"

[[structure]]
pdb_code = "1HOM"
protein = "hom_human"
preferred_chain = "A"
state = "Inactive"
resolution = 2.5
pdb_file = "pdb/1hom.pdb"
"#;

const TEMPLATE: [(&str, char); 6] = [
    ("1x49", 'L'),
    ("1x50", 'N'),
    ("1x51", 'I'),
    ("1x52", 'A'),
    ("1x53", 'F'),
    ("1x54", 'S'),
];

const HOMOLOG: [(&str, char); 6] = [
    ("1x49", 'M'),
    ("1x50", 'D'),
    ("1x51", 'V'),
    ("1x52", 'G'),
    ("1x53", 'Y'),
    ("1x54", 'T'),
];

fn indexed_structure(residues: &[(&str, char)], shift: f64) -> Structure {
    let mut chain = Chain::new("A");
    for (i, (label, aa)) in residues.iter().enumerate() {
        let gn: GenericNumber = label.parse().unwrap();
        let b_factor = encode_generic_number(&gn).unwrap();
        let standard = StandardResidue::from_one_letter(*aa).unwrap();
        let mut residue = Residue::new(
            i as i32 + 1,
            None,
            standard.name(),
            Some(standard),
            ResidueCategory::Standard,
        );
        let x = 3.8 * i as f64 + shift;
        for (name, element, pos) in [
            ("N", Element::N, Point::new(x - 0.5, 1.3, 0.0)),
            ("CA", Element::C, Point::new(x, 0.0, 0.0)),
            ("C", Element::C, Point::new(x + 1.5, 0.0, 0.0)),
            ("O", Element::O, Point::new(x + 2.0, 1.0, 0.0)),
            ("CB", Element::C, Point::new(x, 0.0, 1.5)),
        ] {
            residue.add_atom(Atom::new(name, element, pos).with_b_factor(b_factor));
        }
        chain.add_residue(residue);
    }
    let mut structure = Structure::new();
    structure.add_chain(chain);
    structure
}

fn write_indexed(path: &Path, residues: &[(&str, char)], shift: f64) {
    let file = File::create(path).unwrap();
    write_pdb_structure(file, &indexed_structure(residues, shift)).unwrap();
}

fn config(root: &Path) -> HomologyConfig {
    HomologyConfig {
        pdb_dir: root.join("PDB"),
        pir_dir: root.join("PIR"),
        segments: vec!["TM1".to_string()],
        ..HomologyConfig::default()
    }
}

#[test]
fn model_switches_confirmed_residue_and_writes_pir() {
    let dir = tempfile::tempdir().unwrap();
    let pdb_dir = dir.path().join("PDB");
    fs::create_dir_all(&pdb_dir).unwrap();
    write_indexed(&table_path(&pdb_dir, "1TPL", 'A'), &TEMPLATE, 0.0);
    write_indexed(&table_path(&pdb_dir, "1HOM", 'A'), &HOMOLOG, 0.0);

    let catalog = parse_catalog(CATALOG, Some(dir.path())).unwrap();
    let modeler = HomologyModeler::new(
        &catalog,
        "ref_human",
        ConformationState::Inactive,
        vec![],
        config(dir.path()),
    )
    .unwrap();
    let model = modeler.run().unwrap();

    let stats = &model.statistics;
    assert_eq!(stats.uniprot_id, "P00001");
    assert_eq!(stats.main_template, "1TPL");
    assert_eq!(stats.preferred_chain, 'A');
    assert_eq!(stats.reference_length, 6);
    assert_eq!(stats.conserved, 5);
    assert_eq!(stats.non_conserved, 1);
    assert_eq!(stats.switched, 1);
    assert_eq!(stats.non_conserved_templates[0].pdb_code, "1HOM");
    assert!(stats.anomalies.is_empty());
    assert!(stats.warnings.is_empty());

    assert_eq!(model.alignment.template_string(), "LNVAFS/");
    assert_eq!(model.alignment.reference_string(), "LNVAFS/");

    let pir = model.write_pir(&dir.path().join("PIR")).unwrap();
    assert!(pir.ends_with("P00001_inactive.pir"));
    let content = fs::read_to_string(&pir).unwrap();
    assert!(content.contains("1TPL_A_GPCRDB.pdb"));
    assert!(content.ends_with("sequence:P00001::::::::\nLNVAFS/\n"));

    let json = serde_json::to_value(stats).unwrap();
    assert_eq!(json["main_template"], "1TPL");
    assert_eq!(json["state"], "Inactive");
}

#[test]
fn model_reports_unreadable_main_template() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = parse_catalog(CATALOG, Some(dir.path())).unwrap();
    let modeler = HomologyModeler::new(
        &catalog,
        "ref_human",
        ConformationState::Inactive,
        vec![],
        config(dir.path()),
    )
    .unwrap();

    let error = modeler.run().unwrap_err();
    assert!(matches!(error, Error::MainTemplateUnavailable { ref pdb_code, .. } if pdb_code == "1TPL"));
}

#[test]
fn model_without_templates_in_requested_state_fails() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = parse_catalog(CATALOG, Some(dir.path())).unwrap();
    let modeler = HomologyModeler::new(
        &catalog,
        "ref_human",
        ConformationState::Active,
        vec![],
        config(dir.path()),
    )
    .unwrap();

    assert!(matches!(modeler.run(), Err(Error::NoTemplates { .. })));
}

#[test]
fn written_template_compares_against_shifted_copy() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.pdb");
    let second = dir.path().join("second.pdb");
    write_indexed(&first, &TEMPLATE, 0.0);
    write_indexed(&second, &TEMPLATE, 2.0);

    assert!(pdb_rmsd(&first, &first).unwrap().abs() < 1e-6);
    assert!((pdb_rmsd(&first, &second).unwrap() - 2.0).abs() < 1e-3);
}
