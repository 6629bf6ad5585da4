//! Batch driver: one sequential, idempotent pass over the input directory

use crate::classifier::{classify, Classification, INPUT_ID_COLUMN};
use crate::converter::{convert_file, default_output_path};
use crate::error::{Error, Result};
use crate::pool::{build_merge_pool, csv_files_in};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Final counts for one batch run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// CSV files found in the input directory
    pub found: usize,
    /// Files converted in this run
    pub converted: usize,
    /// Files skipped (already converted, ineligible, or output exists)
    pub skipped: usize,
    /// Conversion attempts that failed; errors were reported per-file
    pub failed: usize,
    /// Distinct identifiers in the merge pool applied to every conversion
    pub pool_size: usize,
}

/// Process every CSV file in the input directory once, to completion.
///
/// The merge pool is built first and applied to every conversion. Per-file
/// errors never abort the run; only a missing input directory does. Existing
/// files are never modified or deleted, so rerunning on an unchanged
/// directory converts nothing further.
pub fn run_batch(input_dir: &Path, merge_dir: &Path) -> Result<BatchSummary> {
    if !input_dir.is_dir() {
        return Err(Error::InputDirMissing(input_dir.to_path_buf()));
    }

    let (pool, _report) = build_merge_pool(merge_dir);

    let files = csv_files_in(input_dir);
    let mut summary = BatchSummary {
        found: files.len(),
        pool_size: pool.len(),
        ..BatchSummary::default()
    };

    if files.is_empty() {
        println!("No CSV files found in '{}'", input_dir.display());
        return Ok(summary);
    }

    println!("Found {} CSV files in input folder", files.len());

    for file in &files {
        println!("\nProcessing: {}", file.display());

        match classify(file) {
            Classification::AlreadyConverted => {
                println!("  skipping - already converted");
                summary.skipped += 1;
            }
            Classification::Ineligible => {
                println!("  skipping - no '{}' column", INPUT_ID_COLUMN);
                summary.skipped += 1;
            }
            Classification::Convertible => {
                let output = default_output_path(file);
                if output.exists() {
                    // idempotence guard: a prior run already produced this file
                    println!("  skipping - output already exists: {}", output.display());
                    summary.skipped += 1;
                    continue;
                }

                let pool_ref = if pool.is_empty() { None } else { Some(&pool) };
                match convert_file(file, Some(&output), pool_ref) {
                    Ok(_) => summary.converted += 1,
                    Err(e) => {
                        eprintln!("  Error converting '{}': {}", file.display(), e);
                        summary.failed += 1;
                    }
                }
            }
        }
    }

    println!("\nConversion complete:");
    println!("  converted: {} files", summary.converted);
    println!("  skipped: {} files", summary.skipped);
    if summary.failed > 0 {
        println!("  failed: {} files", summary.failed);
    }
    if !pool.is_empty() {
        println!("  merge pool applied: {} IDs", pool.len());
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    struct Fixture {
        _dir: tempfile::TempDir,
        input: PathBuf,
        merge: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input");
        let merge = dir.path().join("merge");
        fs::create_dir(&input).unwrap();
        fs::create_dir(&merge).unwrap();
        Fixture {
            _dir: dir,
            input,
            merge,
        }
    }

    #[test]
    fn test_missing_input_dir_is_fatal() {
        let err = run_batch(Path::new("no/such/input"), Path::new("no/such/merge")).unwrap_err();
        assert!(matches!(err, Error::InputDirMissing(_)));
    }

    #[test]
    fn test_empty_input_dir_is_clean() {
        let fx = fixture();
        let summary = run_batch(&fx.input, &fx.merge).unwrap();
        assert_eq!(summary.found, 0);
        assert_eq!(summary.converted, 0);
        assert_eq!(summary.skipped, 0);
    }

    #[test]
    fn test_batch_converts_and_merges() {
        let fx = fixture();
        fs::write(
            fx.input.join("export.csv"),
            "Name,ID Subjektu\na,TEST-001\nb,TEST-002\nc,MERGE-001\n",
        )
        .unwrap();
        fs::write(fx.merge.join("extra.csv"), "ID\nMERGE-001\nMERGE-002\nMERGE-003\n").unwrap();

        let summary = run_batch(&fx.input, &fx.merge).unwrap();
        assert_eq!(summary.found, 1);
        assert_eq!(summary.converted, 1);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.pool_size, 3);

        let content = fs::read_to_string(fx.input.join("export_converted.csv")).unwrap();
        assert_eq!(
            content,
            "ID\nMERGE-001\nMERGE-002\nMERGE-003\nTEST-001\nTEST-002\n"
        );
    }

    #[test]
    fn test_second_run_converts_nothing() {
        let fx = fixture();
        fs::write(fx.input.join("export.csv"), "ID Subjektu\nA-1\nB-2\n").unwrap();

        let first = run_batch(&fx.input, &fx.merge).unwrap();
        assert_eq!(first.converted, 1);

        let output = fx.input.join("export_converted.csv");
        let first_bytes = fs::read(&output).unwrap();

        let second = run_batch(&fx.input, &fx.merge).unwrap();
        assert_eq!(second.converted, 0);
        // both the input and its output are now present and both skip
        assert_eq!(second.found, 2);
        assert_eq!(second.skipped, 2);

        assert_eq!(fs::read(&output).unwrap(), first_bytes);
    }

    #[test]
    fn test_only_converted_files_skips_all() {
        let fx = fixture();
        fs::write(fx.input.join("a_converted.csv"), "ID\nA-1\n").unwrap();
        fs::write(fx.input.join("b_converted.csv"), "ID\nB-2\n").unwrap();

        let summary = run_batch(&fx.input, &fx.merge).unwrap();
        assert_eq!(summary.converted, 0);
        assert_eq!(summary.skipped, 2);

        let remaining = csv_files_in(&fx.input);
        assert_eq!(remaining.len(), 2);
    }

    #[test]
    fn test_existing_output_guard() {
        let fx = fixture();
        fs::write(fx.input.join("export.csv"), "ID Subjektu\nA-1\n").unwrap();
        fs::write(fx.input.join("export_converted.csv"), "ID\nSTALE\n").unwrap();

        let summary = run_batch(&fx.input, &fx.merge).unwrap();
        assert_eq!(summary.converted, 0);

        // the stale output is left untouched
        let content = fs::read_to_string(fx.input.join("export_converted.csv")).unwrap();
        assert_eq!(content, "ID\nSTALE\n");
    }

    #[test]
    fn test_ineligible_file_does_not_abort_batch() {
        let fx = fixture();
        fs::write(fx.input.join("a.csv"), "Name,Date\nx,2025-05-30\n").unwrap();
        fs::write(fx.input.join("b.csv"), "ID Subjektu\nB-1\n").unwrap();

        let summary = run_batch(&fx.input, &fx.merge).unwrap();
        assert_eq!(summary.found, 2);
        assert_eq!(summary.converted, 1);
        assert_eq!(summary.skipped, 1);
        assert!(fx.input.join("b_converted.csv").exists());
        assert!(!fx.input.join("a_converted.csv").exists());
    }

    #[test]
    fn test_missing_merge_dir_is_not_an_error() {
        let fx = fixture();
        fs::write(fx.input.join("export.csv"), "ID Subjektu\nA-1\n").unwrap();

        let missing = fx.merge.join("nope");
        let summary = run_batch(&fx.input, &missing).unwrap();
        assert_eq!(summary.converted, 1);
        assert_eq!(summary.pool_size, 0);

        let content = fs::read_to_string(fx.input.join("export_converted.csv")).unwrap();
        assert_eq!(content, "ID\nA-1\n");
    }
}
