use super::atom::Atom;
use super::types::{ResidueCategory, StandardResidue};
use std::fmt;

/// Identity of a residue inside a chain: hetero flag, sequence number, and insertion code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueKey {
    pub hetero: bool,
    pub id: i32,
    pub insertion_code: Option<char>,
}

impl ResidueKey {
    /// Key of an ordinary polymer residue without insertion code.
    pub fn polymer(id: i32) -> Self {
        Self {
            hetero: false,
            id,
            insertion_code: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub id: i32,
    pub insertion_code: Option<char>,
    pub name: String,
    pub standard_name: Option<StandardResidue>,
    pub category: ResidueCategory,
    atoms: Vec<Atom>,
}

impl Residue {
    pub fn new(
        id: i32,
        insertion_code: Option<char>,
        name: &str,
        standard_name: Option<StandardResidue>,
        category: ResidueCategory,
    ) -> Self {
        Self {
            id,
            insertion_code,
            name: name.to_string(),
            standard_name,
            category,
            atoms: Vec::new(),
        }
    }

    pub fn key(&self) -> ResidueKey {
        ResidueKey {
            hetero: self.category != ResidueCategory::Standard,
            id: self.id,
            insertion_code: self.insertion_code,
        }
    }

    pub fn is_standard(&self) -> bool {
        self.standard_name.is_some()
    }

    pub fn is_glycine(&self) -> bool {
        self.standard_name == Some(StandardResidue::GLY)
    }

    /// One-letter amino-acid code, if the residue maps onto a standard amino acid.
    pub fn one_letter(&self) -> Option<char> {
        self.standard_name.map(|s| s.one_letter())
    }

    pub fn add_atom(&mut self, atom: Atom) {
        debug_assert!(
            self.atom(&atom.name).is_none(),
            "Attempted to add a duplicate atom name '{}' to residue '{}'",
            atom.name,
            self.name
        );
        self.atoms.push(atom);
    }

    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name == name)
    }

    pub fn has_atom(&self, name: &str) -> bool {
        self.atom(name).is_some()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn iter_atoms(&self) -> std::slice::Iter<'_, Atom> {
        self.atoms.iter()
    }

    pub fn iter_atoms_mut(&mut self) -> std::slice::IterMut<'_, Atom> {
        self.atoms.iter_mut()
    }

    /// Keeps only the atoms whose names appear in `names`, preserving their order.
    pub fn retain_atoms(&mut self, names: &[&str]) {
        self.atoms.retain(|a| names.contains(&a.name.as_str()));
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icode = self.insertion_code.map(String::from).unwrap_or_default();
        write!(
            f,
            "Residue {{ id: {}{}, name: \"{}\", category: {}, atoms: {} }}",
            self.id,
            icode,
            self.name,
            self.category,
            self.atom_count()
        )
    }
}
