//! Cell normalization for wide tables.
//!
//! Turns raw text cells into numbers before reshaping. Parse failures are
//! contained per cell: the cell becomes missing and the failure is recorded
//! in the [`NormalizationReport`].

pub mod numeric;
pub mod suffix;

use serde::{Deserialize, Serialize};
use tidy_model::{CellValue, ParseError, WideTable};
use tracing::{debug, warn};

pub use numeric::{is_decimal, parse_decimal};
pub use suffix::{SUFFIXES, expand_cell, parse_suffixed};

/// How text cells of a table are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericMode {
    /// Plain decimals only.
    #[default]
    Plain,
    /// Decimals with an optional `B`/`M`/`k` magnitude suffix.
    Suffixed,
}

impl NumericMode {
    /// Read a single cell under this mode.
    pub fn cell_number(self, cell: &CellValue) -> Result<Option<f64>, ParseError> {
        match (self, cell) {
            (Self::Plain, CellValue::Text(text)) if !text.trim().is_empty() => {
                parse_decimal(text).map(Some)
            }
            _ => expand_cell(cell),
        }
    }
}

/// A cell that failed to parse and was replaced by a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct CellFailure {
    pub key: String,
    pub column: String,
    pub error: ParseError,
}

/// Outcome counts of [`normalize_table`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizationReport {
    pub parsed: usize,
    pub missing: usize,
    pub failures: Vec<CellFailure>,
}

impl NormalizationReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Convert every cell of `table` to a number or a missing value.
pub fn normalize_table(table: WideTable, mode: NumericMode) -> (WideTable, NormalizationReport) {
    let mut report = NormalizationReport::default();
    let name = table.name().to_string();

    let table = table.map_cells(|key, column, cell| match mode.cell_number(&cell) {
        Ok(Some(value)) => {
            report.parsed += 1;
            CellValue::Number(value)
        }
        Ok(None) => {
            report.missing += 1;
            CellValue::Missing
        }
        Err(error) => {
            debug!(table = %name, key, column, %error, "cell treated as missing");
            report.missing += 1;
            report.failures.push(CellFailure {
                key: key.to_string(),
                column: column.to_string(),
                error,
            });
            CellValue::Missing
        }
    });

    if report.has_failures() {
        warn!(
            table = %name,
            failed = report.failures.len(),
            "cells could not be parsed and were treated as missing"
        );
    }
    (table, report)
}
