//! Single-file conversion to the normalized one-column output

use crate::classifier::{CONVERTED_SUFFIX, INPUT_ID_COLUMN, OUTPUT_ID_COLUMN};
use crate::error::{Error, Result};
use crate::extractor::extract_ids;
use crate::parser::parse_csv;
use crate::pool::MergePool;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of converting one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Where the output was written
    pub output_path: PathBuf,
    /// Distinct identifiers in the output
    pub ids_written: usize,
    /// Distinct identifiers contributed by the merge pool
    pub pool_added: usize,
}

/// Default output location: `<stem>_converted<extension>` next to the input
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut name = format!("{stem}{CONVERTED_SUFFIX}");
    if let Some(ext) = input.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }

    input.with_file_name(name)
}

/// Convert one input file into a single-column "ID" CSV.
///
/// The output set is the union of the input's "ID Subjektu" values and the
/// merge pool, deduplicated, sorted lexicographically ascending. The full
/// output is encoded in memory before a single write, so an interrupted run
/// never leaves a truncated file behind.
pub fn convert_file(
    input: &Path,
    output: Option<&Path>,
    pool: Option<&MergePool>,
) -> Result<ConversionResult> {
    let table = parse_csv(input)?;
    let mut ids = extract_ids(&table, INPUT_ID_COLUMN)?;

    let input_count = ids.len();
    if let Some(pool) = pool {
        ids.extend(pool.iter().cloned());
    }
    let pool_added = ids.len() - input_count;
    if pool_added > 0 {
        println!("  added {} new IDs from merge pool", pool_added);
    }

    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => default_output_path(input),
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([OUTPUT_ID_COLUMN])
        .map_err(|e| Error::Csv {
            path: output_path.clone(),
            source: e,
        })?;
    for id in &ids {
        writer.write_record([id.as_str()]).map_err(|e| Error::Csv {
            path: output_path.clone(),
            source: e,
        })?;
    }
    let buffer = writer.into_inner().map_err(|e| Error::CsvParse {
        path: output_path.clone(),
        message: e.to_string(),
    })?;

    fs::write(&output_path, buffer)?;

    println!(
        "Converted {} IDs from '{}' to '{}'",
        ids.len(),
        input.display(),
        output_path.display()
    );

    Ok(ConversionResult {
        output_path,
        ids_written: ids.len(),
        pool_added,
    })
}
