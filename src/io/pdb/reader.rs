use crate::io::context::IoContext;
use crate::io::error::Error;
use crate::model::{
    atom::Atom,
    chain::Chain,
    residue::Residue,
    structure::Structure,
    types::{Element, Point, ResidueCategory, StandardResidue},
};
use std::collections::HashMap;
use std::io::BufRead;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ResKey {
    res_seq: i32,
    i_code: Option<char>,
    is_hetatm: bool,
}

struct TempResidue {
    key: ResKey,
    raw_name: String,
    atoms: Vec<(f64, Atom)>,
}

#[derive(Default)]
struct TempChain {
    residues: Vec<TempResidue>,
    index: HashMap<ResKey, usize>,
}

/// Reads the first model of a PDB stream.
///
/// Residues and atoms keep the order in which they first appear in the file. Alternate
/// locations collapse onto the conformer with the highest occupancy, keeping the slot of the
/// first occurrence. Reading stops at the first `ENDMDL`, so NMR ensembles yield their first
/// model only.
///
/// # Arguments
///
/// * `reader` - Buffered source of PDB records.
/// * `context` - Residue-name resolution used to classify residues.
///
/// # Returns
///
/// The parsed [`Structure`] or an [`Error`] naming the offending line.
pub fn read<R: BufRead>(reader: R, context: &IoContext) -> Result<Structure, Error> {
    let mut chain_order: Vec<String> = Vec::new();
    let mut chain_map: HashMap<String, TempChain> = HashMap::new();

    for (index, line) in reader.lines().enumerate() {
        let line_num = index + 1;
        let line = line.map_err(|e| Error::from_io(e, None))?;

        if line.starts_with("ENDMDL") {
            break;
        }

        let is_atom = line.starts_with("ATOM  ");
        let is_hetatm = line.starts_with("HETATM");

        if is_atom || is_hetatm {
            parse_atom_record(&line, line_num, is_hetatm, &mut chain_order, &mut chain_map)?;
        }
    }

    let mut structure = Structure::new();

    for chain_id in chain_order {
        let Some(temp_chain) = chain_map.remove(&chain_id) else {
            continue;
        };
        let mut chain = Chain::new(&chain_id);

        for temp_res in temp_chain.residues {
            let (canonical_name, std_enum) = context.classify_residue(&temp_res.raw_name);

            let category = determine_category(
                temp_res.key.is_hetatm,
                std_enum,
                temp_res.atoms.len(),
                &temp_res.raw_name,
            )?;

            let mut residue = Residue::new(
                temp_res.key.res_seq,
                temp_res.key.i_code,
                canonical_name.as_str(),
                std_enum,
                category,
            );

            for (_, atom) in temp_res.atoms {
                residue.add_atom(atom);
            }

            chain.add_residue(residue);
        }
        structure.add_chain(chain);
    }

    Ok(structure)
}

fn parse_atom_record(
    line: &str,
    line_num: usize,
    is_hetatm: bool,
    chain_order: &mut Vec<String>,
    chain_map: &mut HashMap<String, TempChain>,
) -> Result<(), Error> {
    if line.len() < 54 || !line.is_ascii() {
        return Err(Error::parse("PDB", None, line_num, "Atom record too short"));
    }

    let atom_name = line[12..16].trim().to_string();
    let res_name = line[17..20].trim().to_string();
    let chain_id = line[21..22].to_string();
    let i_code = match &line[26..27] {
        " " => None,
        code => code.chars().next(),
    };

    let res_seq = line[22..26]
        .trim()
        .parse::<i32>()
        .map_err(|_| Error::parse("PDB", None, line_num, "Invalid residue sequence number"))?;

    let coordinate = |range: std::ops::Range<usize>, axis: &str| {
        line[range].trim().parse::<f64>().map_err(|_| {
            Error::parse("PDB", None, line_num, format!("Invalid {} coordinate", axis))
        })
    };
    let pos = Point::new(
        coordinate(30..38, "X")?,
        coordinate(38..46, "Y")?,
        coordinate(46..54, "Z")?,
    );

    let occupancy = optional_column(line, 54..60)
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(1.0);
    let b_factor = optional_column(line, 60..66)
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    let element = match optional_column(line, 76..78) {
        Some(symbol) => Element::from_str(symbol).unwrap_or(Element::Unknown),
        None => parse_element_from_name(&atom_name),
    };

    let atom = Atom::new(&atom_name, element, pos).with_b_factor(b_factor);

    if !chain_map.contains_key(&chain_id) {
        chain_order.push(chain_id.clone());
    }
    let temp_chain = chain_map.entry(chain_id).or_default();

    let key = ResKey {
        res_seq,
        i_code,
        is_hetatm,
    };
    let slot = match temp_chain.index.get(&key) {
        Some(&slot) => slot,
        None => {
            temp_chain.residues.push(TempResidue {
                key: key.clone(),
                raw_name: res_name,
                atoms: Vec::new(),
            });
            let slot = temp_chain.residues.len() - 1;
            temp_chain.index.insert(key, slot);
            slot
        }
    };
    let temp_res = &mut temp_chain.residues[slot];

    match temp_res
        .atoms
        .iter_mut()
        .find(|(_, existing)| existing.name == atom.name)
    {
        Some(entry) => {
            if occupancy > entry.0 {
                *entry = (occupancy, atom);
            }
        }
        None => temp_res.atoms.push((occupancy, atom)),
    }

    Ok(())
}

fn optional_column(line: &str, range: std::ops::Range<usize>) -> Option<&str> {
    line.get(range)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn parse_element_from_name(name: &str) -> Element {
    let symbol: String = name
        .trim()
        .chars()
        .skip_while(|c| !c.is_alphabetic())
        .take_while(|c| c.is_alphabetic())
        .collect();

    symbol
        .get(0..1)
        .and_then(|first| Element::from_str(first).ok())
        .unwrap_or(Element::Unknown)
}

fn determine_category(
    is_hetatm: bool,
    std_enum: Option<StandardResidue>,
    atom_count: usize,
    res_name: &str,
) -> Result<ResidueCategory, Error> {
    if std_enum.is_some() && !is_hetatm {
        return Ok(ResidueCategory::Standard);
    }

    if !is_hetatm {
        return Err(Error::unknown_standard_residue(res_name, None));
    }

    if atom_count == 1 {
        Ok(ResidueCategory::Ion)
    } else {
        Ok(ResidueCategory::Hetero)
    }
}
