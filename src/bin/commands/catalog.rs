use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;
use prettytable::{Table, format, row};

use gpcr_forge::db::Catalog;

use crate::commands::write_json;

/// Summarizes the catalog, or exports one structure's generic-number map.
#[derive(Debug, Default, Args)]
pub struct CatalogArgs {
    /// List every structure instead of the per-protein summary.
    #[arg(long)]
    pub structures: bool,
    /// Print the generic-number map of this structure as JSON.
    #[arg(long, value_name = "PDB")]
    pub map: Option<String>,
}

pub fn run(catalog: &Catalog, args: &CatalogArgs) -> Result<()> {
    if let Some(pdb_code) = &args.map {
        let map = catalog
            .generic_number_map(pdb_code)
            .with_context(|| format!("Structure {} is not in the catalog", pdb_code))?;
        return write_json(&map, None);
    }

    let mut stderr = io::stderr().lock();
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);

    if args.structures {
        print_boxed_label(&mut stderr, "Structures")?;
        table.set_titles(row!["PDB", "Protein", "Chain", "State", "Resolution (Å)", "Refined"]);
        for structure in catalog.structures() {
            table.add_row(row![
                structure.pdb_code,
                structure.protein,
                structure.preferred_chain,
                structure.state,
                format!("{:.2}", structure.resolution),
                if structure.refined { "yes" } else { "no" }
            ]);
        }
    } else {
        print_boxed_label(&mut stderr, "Proteins")?;
        table.set_titles(row!["Entry", "Accession", "Family", "Residues", "Numbered", "Structures"]);
        for protein in catalog.proteins() {
            let numbered = protein
                .residues()
                .iter()
                .filter(|r| r.generic_number.is_some())
                .count();
            let structures = catalog
                .structures()
                .iter()
                .filter(|s| s.protein == protein.entry_name)
                .count();
            table.add_row(row![
                protein.entry_name,
                protein.accession,
                protein.family,
                protein.residues().len(),
                numbered,
                structures
            ]);
        }
    }

    table
        .print(&mut stderr)
        .context("Failed to render catalog summary")?;
    writeln!(&mut stderr)?;
    Ok(())
}

fn print_boxed_label<W: Write>(writer: &mut W, title: &str) -> io::Result<()> {
    let inner = format!(" {title} ");
    let width = inner.chars().count();
    writeln!(writer, "╭{}╮", "─".repeat(width))?;
    writeln!(writer, "│{}│", inner)?;
    writeln!(writer, "╰{}╯", "─".repeat(width))?;
    Ok(())
}
