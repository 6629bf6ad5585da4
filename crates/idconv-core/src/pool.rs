//! Merge pool built from an auxiliary directory of CSV files
//!
//! Every conversion in a batch run unions these identifiers into its output.
//! The pool is built once per run and read-only afterwards.

use crate::classifier::{INPUT_ID_COLUMN, OUTPUT_ID_COLUMN};
use crate::extractor::extract_ids;
use crate::parser::parse_csv;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Column names accepted in merge-pool files, checked in priority order
const POOL_ID_COLUMNS: &[&str] = &[OUTPUT_ID_COLUMN, INPUT_ID_COLUMN];

/// The union of identifiers drawn from all CSV files in the merge directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergePool {
    ids: BTreeSet<String>,
}

impl MergePool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct identifiers in the pool
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if the pool holds no identifiers
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Membership test by exact string equality
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Iterate identifiers in lexicographic order
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.ids.iter()
    }
}

impl FromIterator<String> for MergePool {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Per-file outcome of the merge-pool scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PoolFileOutcome {
    /// Identifiers were extracted and unioned into the pool
    Counted { ids: usize },
    /// The file has neither an "ID" nor an "ID Subjektu" column
    NoIdColumn,
    /// The file could not be read or parsed
    Failed { reason: String },
}

/// One scanned merge-directory file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolFileEntry {
    pub path: PathBuf,
    pub outcome: PoolFileOutcome,
}

/// Result of scanning the merge directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolReport {
    /// Directory that was scanned
    pub dir: PathBuf,
    /// Per-file outcomes, in scan order
    pub files: Vec<PoolFileEntry>,
    /// Distinct identifiers across all files
    pub total_unique: usize,
}

/// Enumerate the CSV files directly inside a directory, sorted by path.
///
/// A missing directory yields an empty list.
pub fn csv_files_in(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    files.sort();
    files
}

/// Build the merge pool from all CSV files in a directory.
///
/// The directory need not exist. Per-file parse failures and files without
/// a recognized identifier column are reported and contribute nothing; the
/// scan always completes. Progress goes to stdout, warnings to stderr.
pub fn build_merge_pool(dir: &Path) -> (MergePool, PoolReport) {
    let mut pool = MergePool::new();
    let mut entries = Vec::new();

    let files = csv_files_in(dir);
    if !files.is_empty() {
        println!("Found {} CSV files in merge folder", files.len());
    }

    for path in files {
        let outcome = match parse_csv(&path) {
            Ok(table) => {
                let id_column = POOL_ID_COLUMNS
                    .iter()
                    .find(|name| table.find_column(name).is_some());
                match id_column {
                    Some(name) => match extract_ids(&table, name) {
                        Ok(ids) => {
                            println!("  {}: {} IDs", file_name(&path), ids.len());
                            let count = ids.len();
                            pool.ids.extend(ids);
                            PoolFileOutcome::Counted { ids: count }
                        }
                        Err(e) => {
                            eprintln!("  Error reading {}: {}", file_name(&path), e);
                            PoolFileOutcome::Failed {
                                reason: e.to_string(),
                            }
                        }
                    },
                    None => {
                        eprintln!("  Warning: {}: no ID column found", file_name(&path));
                        PoolFileOutcome::NoIdColumn
                    }
                }
            }
            Err(e) => {
                eprintln!("  Error reading {}: {}", file_name(&path), e);
                PoolFileOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        entries.push(PoolFileEntry { path, outcome });
    }

    if !pool.is_empty() {
        println!("Total unique IDs to merge: {}", pool.len());
    }

    let report = PoolReport {
        dir: dir.to_path_buf(),
        files: entries,
        total_unique: pool.len(),
    };

    (pool, report)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_directory_yields_empty_pool() {
        let (pool, report) = build_merge_pool(Path::new("no/such/dir"));
        assert!(pool.is_empty());
        assert!(report.files.is_empty());
        assert_eq!(report.total_unique, 0);
    }

    #[test]
    fn test_empty_directory_yields_empty_pool() {
        let dir = tempfile::tempdir().unwrap();
        let (pool, report) = build_merge_pool(dir.path());
        assert!(pool.is_empty());
        assert!(report.files.is_empty());
    }

    #[test]
    fn test_pool_unions_across_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "ID\nM-1\nM-2\n").unwrap();
        fs::write(dir.path().join("b.csv"), "ID\nM-2\nM-3\n").unwrap();

        let (pool, report) = build_merge_pool(dir.path());
        assert_eq!(pool.len(), 3);
        assert!(pool.contains("M-1"));
        assert!(pool.contains("M-3"));
        assert_eq!(report.files.len(), 2);
        assert_eq!(report.total_unique, 3);
    }

    #[test]
    fn test_pool_accepts_id_subjektu_column() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "Name,ID Subjektu\nx,M-1\n").unwrap();

        let (pool, _) = build_merge_pool(dir.path());
        assert_eq!(pool.len(), 1);
        assert!(pool.contains("M-1"));
    }

    #[test]
    fn test_pool_prefers_id_over_id_subjektu() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "ID,ID Subjektu\nFROM-ID,FROM-SUBJ\n").unwrap();

        let (pool, _) = build_merge_pool(dir.path());
        assert!(pool.contains("FROM-ID"));
        assert!(!pool.contains("FROM-SUBJ"));
    }

    #[test]
    fn test_file_without_id_column_contributes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "Name,Date\nx,2025-05-30\n").unwrap();
        fs::write(dir.path().join("b.csv"), "ID\nM-1\n").unwrap();

        let (pool, report) = build_merge_pool(dir.path());
        assert_eq!(pool.len(), 1);
        assert!(matches!(
            report.files[0].outcome,
            PoolFileOutcome::NoIdColumn
        ));
    }

    #[test]
    fn test_parse_failure_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.csv"), [0xff, 0x00, 0xff]).unwrap();
        fs::write(dir.path().join("good.csv"), "ID\nM-1\n").unwrap();

        let (pool, report) = build_merge_pool(dir.path());
        assert_eq!(pool.len(), 1);
        assert!(matches!(
            report.files[0].outcome,
            PoolFileOutcome::Failed { .. }
        ));
    }

    #[test]
    fn test_non_csv_files_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "ID\nM-1\n").unwrap();

        assert!(csv_files_in(dir.path()).is_empty());
    }
}
