//! Conversion eligibility classification for candidate CSV files

use crate::parser::parse_csv;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Suffix appended to the stem of converted output files
pub const CONVERTED_SUFFIX: &str = "_converted";

/// Identifier column expected in input files
pub const INPUT_ID_COLUMN: &str = "ID Subjektu";

/// The single column written to output files
pub const OUTPUT_ID_COLUMN: &str = "ID";

/// How a candidate file relates to the conversion pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    /// The file is itself a prior output and must not be reprocessed
    AlreadyConverted,
    /// The file has the identifier column and is eligible for conversion
    Convertible,
    /// The file has neither the converted shape nor the identifier column
    Ineligible,
}

/// Classify a candidate file by name, then by header content.
///
/// The name check comes first: output files are recognizable without being
/// opened. The header check catches outputs that were renamed without the
/// suffix marker. A file that cannot be parsed is Ineligible, not an error.
pub fn classify(path: &Path) -> Classification {
    let stem_marked = path
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.ends_with(CONVERTED_SUFFIX));
    if stem_marked {
        return Classification::AlreadyConverted;
    }

    match parse_csv(path) {
        Ok(table) => classify_table(&table),
        Err(e) => {
            eprintln!("Warning: could not parse '{}': {}", path.display(), e);
            Classification::Ineligible
        }
    }
}

/// Classify a parsed table by its header alone
pub fn classify_table(table: &Table) -> Classification {
    if table.column_count() == 1 && table.columns[0].name == OUTPUT_ID_COLUMN {
        Classification::AlreadyConverted
    } else if table.find_column(INPUT_ID_COLUMN).is_some() {
        Classification::Convertible
    } else {
        Classification::Ineligible
    }
}
