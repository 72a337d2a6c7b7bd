use crate::io::error::Error;
use crate::model::{atom::Atom, residue::Residue, structure::Structure, types::ResidueCategory};
use std::io::Write;

/// Writes a structure as PDB `ATOM`/`HETATM` records, one `TER` per chain, and `END`.
///
/// Atom B-factors are emitted verbatim so GPCRDB-indexed tables survive a round trip.
pub fn write_structure<W: Write>(writer: W, structure: &Structure) -> Result<(), Error> {
    let mut pdb = PdbWriter { writer, serial: 0 };

    for chain in structure.iter_chains() {
        let chain_id = chain.id.chars().next().unwrap_or(' ');
        for residue in chain.iter_residues() {
            for atom in residue.iter_atoms() {
                pdb.atom(atom, residue, chain_id)?;
            }
        }
        // Only polymer chains are terminated.
        if let Some(last) = chain
            .iter_residues()
            .rev()
            .find(|r| r.category == ResidueCategory::Standard)
        {
            pdb.ter(last, chain_id)?;
        }
    }

    writeln!(pdb.writer, "END   ").map_err(io_error)
}

struct PdbWriter<W> {
    writer: W,
    serial: usize,
}

impl<W: Write> PdbWriter<W> {
    fn next_serial(&mut self) -> usize {
        self.serial += 1;
        self.serial % 100_000
    }

    fn atom(&mut self, atom: &Atom, residue: &Residue, chain_id: char) -> Result<(), Error> {
        let record = match residue.category {
            ResidueCategory::Standard => "ATOM  ",
            _ => "HETATM",
        };
        let serial = self.next_serial();
        writeln!(
            self.writer,
            "{record}{serial:5} {name:4} {res:3} {chain_id}{seq:4}{icode}   {x:8.3}{y:8.3}{z:8.3}{occ:6.2}{b:6.2}          {element:>2}",
            name = atom_name(atom),
            res = residue_label(residue),
            seq = residue.id % 10_000,
            icode = residue.insertion_code.unwrap_or(' '),
            x = atom.pos.x,
            y = atom.pos.y,
            z = atom.pos.z,
            occ = 1.0,
            b = atom.b_factor,
            element = atom.element.symbol().to_uppercase(),
        )
        .map_err(io_error)
    }

    fn ter(&mut self, residue: &Residue, chain_id: char) -> Result<(), Error> {
        let serial = self.next_serial();
        writeln!(
            self.writer,
            "TER   {serial:5}      {res:3} {chain_id}{seq:4}{icode}",
            res = residue_label(residue),
            seq = residue.id % 10_000,
            icode = residue.insertion_code.unwrap_or(' '),
        )
        .map_err(io_error)
    }
}

fn io_error(e: std::io::Error) -> Error {
    Error::from_io(e, None)
}

/// Four-character names start in column 13, shorter ones in column 14.
fn atom_name(atom: &Atom) -> String {
    if atom.name.len() >= 4 {
        atom.name[..4].to_string()
    } else {
        format!(" {:<3}", atom.name)
    }
}

fn residue_label(residue: &Residue) -> &str {
    residue.name.get(..3).unwrap_or(&residue.name)
}
