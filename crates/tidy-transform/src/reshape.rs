//! Wide-to-long reshaping ("melt").
//!
//! Every cell of a [`WideTable`] becomes one [`LongRecord`]. Missing cells
//! are kept as `None` so later stages decide whether to drop them.

use std::ops::RangeInclusive;

use tidy_model::{LongRecord, LongTable, SchemaError, WideTable};
use tracing::{debug, warn};

use crate::normalization::NumericMode;

/// Options for [`melt_with`].
#[derive(Debug, Clone, Default)]
pub struct MeltOptions {
    /// Only reshape year columns inside this range.
    pub years: Option<RangeInclusive<i32>>,
    /// How text cells that were not normalized beforehand are read.
    pub numeric: NumericMode,
}

impl MeltOptions {
    #[must_use]
    pub fn with_years(mut self, years: RangeInclusive<i32>) -> Self {
        self.years = Some(years);
        self
    }

    #[must_use]
    pub fn with_numeric(mut self, numeric: NumericMode) -> Self {
        self.numeric = numeric;
        self
    }
}

/// Parse the value column labels of `table` as years.
///
/// Any label that is not an integer is a schema error for the whole table.
pub fn year_columns(table: &WideTable) -> Result<Vec<i32>, SchemaError> {
    table
        .columns()
        .iter()
        .map(|label| {
            label
                .trim()
                .parse::<i32>()
                .map_err(|_| SchemaError::InvalidYearLabel {
                    table: table.name().to_string(),
                    label: label.clone(),
                })
        })
        .collect()
}

/// Reshape every cell of `table` into a long record named `value_name`.
pub fn melt(table: &WideTable, value_name: &str) -> Result<LongTable, SchemaError> {
    melt_with(table, value_name, &MeltOptions::default())
}

/// Reshape `table`, optionally restricted to a range of year columns.
///
/// Records come out grouped by country, years in column order.
pub fn melt_with(
    table: &WideTable,
    value_name: &str,
    options: &MeltOptions,
) -> Result<LongTable, SchemaError> {
    let years = year_columns(table)?;
    let selected: Vec<(usize, i32)> = years
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, year)| options.years.as_ref().is_none_or(|range| range.contains(year)))
        .collect();

    let mut records = Vec::with_capacity(table.rows().len() * selected.len());
    let mut unparsed = 0usize;
    for row in table.rows() {
        for &(idx, year) in &selected {
            let value = match options.numeric.cell_number(&row.cells[idx]) {
                Ok(value) => value,
                Err(error) => {
                    debug!(
                        table = table.name(),
                        key = %row.key,
                        year,
                        %error,
                        "cell treated as missing"
                    );
                    unparsed += 1;
                    None
                }
            };
            records.push(LongRecord::new(row.key.clone(), year, value));
        }
    }

    if unparsed > 0 {
        warn!(
            table = table.name(),
            unparsed, "cells could not be parsed and were treated as missing"
        );
    }
    debug!(
        table = table.name(),
        metric = value_name,
        countries = table.rows().len(),
        years = selected.len(),
        records = records.len(),
        "melted table"
    );
    Ok(LongTable::new(value_name, records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidy_model::CellValue;

    fn mortality() -> WideTable {
        let mut table = WideTable::new(
            "mortality",
            "country",
            vec!["1990".to_string(), "2000".to_string(), "2010".to_string()],
        );
        table
            .push_row(
                "Chad",
                vec![
                    CellValue::Number(210.0),
                    CellValue::Missing,
                    CellValue::Text("155".to_string()),
                ],
            )
            .unwrap();
        table
            .push_row(
                "Peru",
                vec![
                    CellValue::Number(80.0),
                    CellValue::Number(40.0),
                    CellValue::Text("oops".to_string()),
                ],
            )
            .unwrap();
        table
    }

    #[test]
    fn test_melt_produces_cell_per_record() {
        let long = melt(&mortality(), "child_mortality").unwrap();

        assert_eq!(long.metric, "child_mortality");
        assert_eq!(long.records.len(), 6);
        assert_eq!(long.records[0], LongRecord::new("Chad", 1990, Some(210.0)));
        assert_eq!(long.records[1], LongRecord::new("Chad", 2000, None));
        assert_eq!(long.records[2], LongRecord::new("Chad", 2010, Some(155.0)));
        // Unparseable text becomes missing rather than failing the table.
        assert_eq!(long.records[5], LongRecord::new("Peru", 2010, None));
    }

    #[test]
    fn test_melt_rejects_non_year_label() {
        let table = WideTable::new(
            "gdp",
            "country",
            vec!["2000".to_string(), "notes".to_string()],
        );
        let err = melt(&table, "gdp").unwrap_err();
        assert_eq!(
            err,
            SchemaError::InvalidYearLabel {
                table: "gdp".to_string(),
                label: "notes".to_string(),
            }
        );
    }

    #[test]
    fn test_melt_with_year_range() {
        let options = MeltOptions::default().with_years(1995..=2010);
        let long = melt_with(&mortality(), "child_mortality", &options).unwrap();

        assert_eq!(long.records.len(), 4);
        assert!(long.records.iter().all(|r| r.year >= 1995));
    }

    #[test]
    fn test_melt_suffixed_mode() {
        let mut table = WideTable::new("pop", "country", vec!["2000".to_string()]);
        table
            .push_row("Chad", vec![CellValue::Text("8.4M".to_string())])
            .unwrap();
        let options = MeltOptions::default().with_numeric(NumericMode::Suffixed);
        let long = melt_with(&table, "population", &options).unwrap();
        assert_eq!(long.records[0].value, Some(8_400_000.0));
    }

    #[test]
    fn test_year_columns_trims_labels() {
        let table = WideTable::new("t", "country", vec![" 1800 ".to_string()]);
        assert_eq!(year_columns(&table).unwrap(), vec![1800]);
    }
}
