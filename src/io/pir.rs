//! PIR alignment records as read by MODELLER.

use super::error::Error;
use std::io::Write;

/// Kind of a PIR record, written on its type line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PirKind {
    Structure,
    Sequence,
}

impl PirKind {
    fn label(&self) -> &'static str {
        match self {
            PirKind::Structure => "structure",
            PirKind::Sequence => "sequence",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PirRecord {
    pub identifier: String,
    pub kind: PirKind,
    pub sequence: String,
}

impl PirRecord {
    pub fn new(identifier: impl Into<String>, kind: PirKind, sequence: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
            sequence: sequence.into(),
        }
    }
}

/// Writes PIR records in order, each as a `>P1;` header, a type line, and the sequence body.
///
/// Records are separated by a blank line; sequence bodies are written on a single line.
pub fn write_pir<W: Write>(mut writer: W, records: &[PirRecord]) -> Result<(), Error> {
    for (index, record) in records.iter().enumerate() {
        if index > 0 {
            writeln!(writer).map_err(|e| Error::from_io(e, None))?;
        }
        writeln!(writer, ">P1;{}", record.identifier).map_err(|e| Error::from_io(e, None))?;
        writeln!(
            writer,
            "{}:{}::::::::",
            record.kind.label(),
            record.identifier
        )
        .map_err(|e| Error::from_io(e, None))?;
        writeln!(writer, "{}", record.sequence).map_err(|e| Error::from_io(e, None))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_pir_emits_template_then_reference() {
        let records = [
            PirRecord::new(
                "structure/PDB/4DKL_A_GPCRDB.pdb",
                PirKind::Structure,
                "LA-V/GG",
            ),
            PirRecord::new("P35372", PirKind::Sequence, "LAIV/GG"),
        ];

        let mut buffer = Vec::new();
        write_pir(&mut buffer, &records).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert_eq!(
            output,
            ">P1;structure/PDB/4DKL_A_GPCRDB.pdb\n\
             structure:structure/PDB/4DKL_A_GPCRDB.pdb::::::::\n\
             LA-V/GG\n\
             \n\
             >P1;P35372\n\
             sequence:P35372::::::::\n\
             LAIV/GG\n"
        );
    }
}
