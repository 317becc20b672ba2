//! CSV export of a filtered sales table.

use crate::config;
use crate::error::{DashboardError, Result};
use crate::models::{Column, SaleRecord};

/// Encode `records` as UTF-8 CSV with a header of the selected column labels.
///
/// No index column is written. An empty column selection produces an empty
/// payload.
pub fn encode_csv(records: &[SaleRecord], columns: &[Column]) -> Result<Vec<u8>> {
    if columns.is_empty() {
        return Ok(Vec::new());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns.iter().map(|c| c.label()))?;
    for record in records {
        writer.write_record(columns.iter().map(|c| c.value_of(record)))?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| DashboardError::Io(e.into_error()))
}

/// Normalize a user-supplied download name: trimmed, defaulting to
/// [`config::DEFAULT_EXPORT_NAME`], always ending in a single `.csv`.
pub fn csv_file_name(name: &str) -> String {
    let trimmed = name.trim();
    let has_suffix = trimmed
        .len()
        .checked_sub(4)
        .and_then(|start| trimmed.get(start..))
        .is_some_and(|tail| tail.eq_ignore_ascii_case(".csv"));
    let stem = if has_suffix {
        &trimmed[..trimmed.len() - 4]
    } else {
        trimmed
    };
    // Quotes and path separators would break the Content-Disposition header
    let stem: String = stem
        .chars()
        .filter(|c| !matches!(c, '"' | '/' | '\\') && !c.is_control())
        .collect();
    let stem = if stem.trim().is_empty() {
        config::DEFAULT_EXPORT_NAME.to_string()
    } else {
        stem
    };
    format!("{}.csv", stem)
}
