use std::fs::File;
use std::io::{self as stdio, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use serde::Serialize;

use gpcr_forge::ConformationState;
use gpcr_forge::db::{Catalog, load_catalog};

pub mod angles;
pub mod catalog;
pub mod model;
pub mod rmsd;

/// Conformation states accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StateArg {
    #[value(name = "inactive")]
    Inactive,
    #[value(name = "intermediate")]
    Intermediate,
    #[value(name = "active")]
    Active,
    #[value(name = "other")]
    Other,
}

impl From<StateArg> for ConformationState {
    fn from(value: StateArg) -> Self {
        match value {
            StateArg::Inactive => ConformationState::Inactive,
            StateArg::Intermediate => ConformationState::Intermediate,
            StateArg::Active => ConformationState::Active,
            StateArg::Other => ConformationState::Other,
        }
    }
}

/// Loads the structure catalog the pipelines read from.
pub fn open_catalog(path: &Path) -> Result<Catalog> {
    load_catalog(path).with_context(|| format!("Failed to load catalog {}", path.display()))
}

/// Writes `value` as pretty JSON to `output`, or to stdout when no path is given.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)
                .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
            writeln!(writer)?;
            writer.flush().context("Failed to flush output writer")?;
        }
        None => {
            let stdout = stdio::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            serde_json::to_writer_pretty(&mut writer, value)
                .context("Failed to write JSON to stdout")?;
            writeln!(writer)?;
            writer.flush().context("Failed to flush stdout")?;
        }
    }
    Ok(())
}

/// Wraps long-running operations with a spinner rendered to stderr.
///
/// The spinner is skipped when stderr is not a terminal so log output stays readable.
pub fn run_with_spinner<T, F>(message: &str, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    if !stdio::stderr().is_terminal() {
        return work();
    }

    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());

    let result = work();

    match &result {
        Ok(_) => spinner.finish_with_message(format!("{} ✓", message)),
        Err(_) => spinner.abandon_with_message(format!("{} ✗", message)),
    }

    result
}
