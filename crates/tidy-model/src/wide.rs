//! Wide-format tables: one row per country, one column per year.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// A raw cell as it came out of the source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Empty or null in the source.
    #[default]
    Missing,
    /// Already numeric.
    Number(f64),
    /// Unparsed text, e.g. `"1.2B"` in population tables.
    Text(String),
}

impl CellValue {
    /// Builds a cell from source text, mapping blank text to [`CellValue::Missing`].
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::Missing
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// One country row of a [`WideTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub key: String,
    pub cells: Vec<CellValue>,
}

/// A wide-format table keyed by a single column.
///
/// The key is unique per table and every row has one cell per value column.
/// Value column labels are kept as text; the reshaper turns them into years.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    name: String,
    key_column: String,
    columns: Vec<String>,
    rows: Vec<WideRow>,
    keys: HashSet<String>,
}

impl WideTable {
    /// Creates an empty table with the given value column labels.
    pub fn new(
        name: impl Into<String>,
        key_column: impl Into<String>,
        columns: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            key_column: key_column.into(),
            columns,
            rows: Vec::new(),
            keys: HashSet::new(),
        }
    }

    /// Appends a row, rejecting repeated keys and rows of the wrong width.
    pub fn push_row(
        &mut self,
        key: impl Into<String>,
        cells: Vec<CellValue>,
    ) -> Result<(), SchemaError> {
        let key = key.into();
        if cells.len() != self.columns.len() {
            return Err(SchemaError::RowWidth {
                table: self.name.clone(),
                key,
                expected: self.columns.len(),
                found: cells.len(),
            });
        }
        if !self.keys.insert(key.clone()) {
            return Err(SchemaError::DuplicateKey {
                table: self.name.clone(),
                key,
            });
        }
        self.rows.push(WideRow { key, cells });
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }

    /// Value column labels in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[WideRow] {
        &self.rows
    }

    /// Returns the row for `key`, if present.
    pub fn row(&self, key: &str) -> Option<&WideRow> {
        if !self.keys.contains(key) {
            return None;
        }
        self.rows.iter().find(|row| row.key == key)
    }

    /// Number of cells (rows × value columns).
    pub fn cell_count(&self) -> usize {
        self.rows.len() * self.columns.len()
    }

    /// Rewrites every cell, passing the row key and column label alongside.
    #[must_use]
    pub fn map_cells<F>(mut self, mut f: F) -> Self
    where
        F: FnMut(&str, &str, CellValue) -> CellValue,
    {
        for row in &mut self.rows {
            for (column, cell) in self.columns.iter().zip(row.cells.iter_mut()) {
                let value = std::mem::take(cell);
                *cell = f(&row.key, column, value);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|label| (*label).to_string()).collect()
    }

    #[test]
    fn test_from_text_blank_is_missing() {
        assert_eq!(CellValue::from_text("   "), CellValue::Missing);
        assert_eq!(
            CellValue::from_text(" 1.2B "),
            CellValue::Text("1.2B".to_string())
        );
    }

    #[test]
    fn test_push_row_rejects_duplicate_key() {
        let mut table = WideTable::new("pop", "country", columns(&["2000"]));
        table
            .push_row("Chad", vec![CellValue::Number(1.0)])
            .unwrap();
        let err = table
            .push_row("Chad", vec![CellValue::Number(2.0)])
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateKey { .. }));
        assert_eq!(table.rows().len(), 1);
    }

    #[test]
    fn test_push_row_rejects_wrong_width() {
        let mut table = WideTable::new("pop", "country", columns(&["2000", "2001"]));
        let err = table
            .push_row("Chad", vec![CellValue::Missing])
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::RowWidth {
                table: "pop".to_string(),
                key: "Chad".to_string(),
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn test_map_cells_sees_key_and_column() {
        let mut table = WideTable::new("pop", "country", columns(&["2000", "2001"]));
        table
            .push_row("Chad", vec![CellValue::Missing, CellValue::Number(3.0)])
            .unwrap();

        let mut seen = Vec::new();
        let table = table.map_cells(|key, column, cell| {
            seen.push(format!("{key}/{column}"));
            match cell {
                CellValue::Missing => CellValue::Number(0.0),
                other => other,
            }
        });

        assert_eq!(seen, vec!["Chad/2000", "Chad/2001"]);
        assert_eq!(
            table.row("Chad").unwrap().cells,
            vec![CellValue::Number(0.0), CellValue::Number(3.0)]
        );
        assert_eq!(table.cell_count(), 2);
    }
}
