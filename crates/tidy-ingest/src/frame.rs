//! Conversion of Polars frames into [`WideTable`]s.

use polars::prelude::{AnyValue, DataFrame};
use tidy_model::{CellValue, SchemaError, WideTable};
use tracing::{debug, warn};

use crate::csv::normalize_header;
use crate::error::Result;
use crate::load::LoadOptions;

/// Converts a Polars AnyValue to a raw cell.
pub fn any_to_cell(value: AnyValue<'_>) -> CellValue {
    match value {
        AnyValue::Null => CellValue::Missing,
        AnyValue::Int8(v) => CellValue::Number(f64::from(v)),
        AnyValue::Int16(v) => CellValue::Number(f64::from(v)),
        AnyValue::Int32(v) => CellValue::Number(f64::from(v)),
        AnyValue::Int64(v) => CellValue::Number(v as f64),
        AnyValue::UInt8(v) => CellValue::Number(f64::from(v)),
        AnyValue::UInt16(v) => CellValue::Number(f64::from(v)),
        AnyValue::UInt32(v) => CellValue::Number(f64::from(v)),
        AnyValue::UInt64(v) => CellValue::Number(v as f64),
        AnyValue::Float32(v) => CellValue::Number(f64::from(v)),
        AnyValue::Float64(v) => CellValue::Number(v),
        AnyValue::String(s) => CellValue::from_text(s),
        AnyValue::StringOwned(s) => CellValue::from_text(&s),
        other => CellValue::from_text(&other.to_string()),
    }
}

/// Converts a key cell to a trimmed string, `None` when null or blank.
pub fn any_to_key(value: AnyValue<'_>) -> Option<String> {
    let key = match value {
        AnyValue::Null => return None,
        AnyValue::String(s) => s.trim().to_string(),
        AnyValue::StringOwned(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    if key.is_empty() { None } else { Some(key) }
}

/// Builds a [`WideTable`] from `df`, keyed by `options.key_column`.
///
/// Rows with a blank key or a key listed in `options.placeholder_keys` are
/// skipped. Every other column becomes a value column in source order.
pub fn frame_to_wide_table(df: &DataFrame, name: &str, options: &LoadOptions) -> Result<WideTable> {
    let headers: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|column| normalize_header(column))
        .collect();
    let key_idx = headers
        .iter()
        .position(|header| *header == options.key_column)
        .ok_or_else(|| SchemaError::MissingKeyColumn {
            table: name.to_string(),
            column: options.key_column.clone(),
        })?;

    let value_idx: Vec<usize> = (0..headers.len()).filter(|idx| *idx != key_idx).collect();
    let labels = value_idx.iter().map(|idx| headers[*idx].clone()).collect();
    let mut table = WideTable::new(name, options.key_column.as_str(), labels);

    let columns = df.get_columns();
    let mut skipped = 0usize;
    for row in 0..df.height() {
        let Some(key) = any_to_key(columns[key_idx].get(row)?) else {
            skipped += 1;
            continue;
        };
        if options.placeholder_keys.contains(&key) {
            debug!(table = name, key = %key, "skipping placeholder key");
            skipped += 1;
            continue;
        }
        let cells = value_idx
            .iter()
            .map(|idx| columns[*idx].get(row).map(any_to_cell))
            .collect::<polars::prelude::PolarsResult<Vec<_>>>()?;
        table.push_row(key, cells)?;
    }

    if skipped > 0 {
        warn!(table = name, skipped, "rows without a usable key were skipped");
    }
    Ok(table)
}
