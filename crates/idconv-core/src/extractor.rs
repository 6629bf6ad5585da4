//! Identifier extraction from a parsed table column

use crate::error::{Error, Result};
use crate::table::Table;
use std::collections::BTreeSet;

/// Extract the set of distinct, non-empty identifiers from one column.
///
/// Empty and whitespace-only cells are treated as missing and dropped.
/// The returned `BTreeSet` iterates in lexicographic order, which is the
/// ordering conversion output relies on.
pub fn extract_ids(table: &Table, column_name: &str) -> Result<BTreeSet<String>> {
    let column = table
        .find_column(column_name)
        .ok_or_else(|| Error::MissingIdColumn {
            column: column_name.to_string(),
            path: table.source_path.clone(),
            columns: table.column_names(),
        })?;

    let mut ids = BTreeSet::new();
    for row in &table.rows {
        if let Some(value) = row.get(column.index) {
            let value = value.trim();
            if !value.is_empty() {
                ids.insert(value.to_string());
            }
        }
    }

    Ok(ids)
}
