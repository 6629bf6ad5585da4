//! idconv-core: Core library for normalizing subject-ID CSV files
//!
//! This library provides functionality to:
//! - Parse CSV files into structured tables (string cells, header row)
//! - Extract the set of unique, non-empty identifiers from a column
//! - Build a merge pool from an auxiliary directory of CSV files
//! - Classify candidate files (already converted / convertible / ineligible)
//! - Convert one file into a single-column "ID" CSV, unioned with the pool
//! - Drive an idempotent batch run over an input directory

pub mod batch;
pub mod classifier;
pub mod converter;
pub mod error;
pub mod extractor;
pub mod parser;
pub mod pool;
pub mod table;

pub use batch::{run_batch, BatchSummary};
pub use classifier::{
    classify, classify_table, Classification, CONVERTED_SUFFIX, INPUT_ID_COLUMN, OUTPUT_ID_COLUMN,
};
pub use converter::{convert_file, default_output_path, ConversionResult};
pub use error::{Error, Result};
pub use extractor::extract_ids;
pub use parser::{parse_csv, parse_csv_str};
pub use pool::{build_merge_pool, csv_files_in, MergePool, PoolFileEntry, PoolFileOutcome, PoolReport};
pub use table::{Column, Row, Table};
