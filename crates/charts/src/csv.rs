//! Lenient CSV reading for experiment tables.
//!
//! Handles quoted fields, doubled quotes, and embedded commas or
//! newlines; blank lines are dropped. Records come back as ordered
//! header → value maps so unknown extra columns pass through untouched.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::{ChartsError, Result};

/// Split raw CSV text into rows of cells.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    cell.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                row.push(std::mem::take(&mut cell));
            }
            '\r' | '\n' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut cell));
                let is_blank = row.len() == 1 && row[0].is_empty();
                if !is_blank {
                    rows.push(std::mem::take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => cell.push(ch),
        }
    }
    if !cell.is_empty() || !row.is_empty() {
        row.push(cell);
        rows.push(row);
    }
    rows
}

/// One record: ordered column → value map.
pub type Record = IndexMap<String, String>;

/// Read a CSV file into header-keyed records.
///
/// A missing cell at the end of a short row becomes an empty string, the
/// way a hand-edited table usually intends.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    if !path.exists() {
        return Err(ChartsError::MissingFile(path.to_path_buf()));
    }
    let raw = fs::read_to_string(path).map_err(|source| ChartsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = parse_rows(&raw);
    let Some((headers, body)) = rows.split_first() else {
        return Ok(Vec::new());
    };
    Ok(body
        .iter()
        .map(|cells| {
            headers
                .iter()
                .enumerate()
                .map(|(idx, header)| {
                    (header.clone(), cells.get(idx).cloned().unwrap_or_default())
                })
                .collect()
        })
        .collect())
}

/// Fail unless every required column is present in the header set.
pub fn require_columns(path: &Path, records: &[Record], columns: &[&str]) -> Result<()> {
    for column in columns {
        let present = records
            .first()
            .map(|record| record.contains_key(*column))
            // An empty table has no header to check against; let it pass
            // and render an empty dashboard.
            .unwrap_or(true);
        if !present {
            return Err(ChartsError::MissingColumn {
                file: path.to_path_buf(),
                column: (*column).to_string(),
            });
        }
    }
    Ok(())
}

/// Numeric coercion for embedding: unparseable or empty becomes null.
pub fn parse_number(value: &str) -> Option<f64> {
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}
