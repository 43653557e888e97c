//! Error types shared by the tidy pipeline stages.

use thiserror::Error;

/// A table does not have the shape the pipeline requires.
///
/// Schema errors are fatal for the table they were raised on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The key column (normally `country`) is absent from the header.
    #[error("table '{table}' has no key column '{column}'")]
    MissingKeyColumn { table: String, column: String },

    /// A value column label cannot be read as an integer year.
    #[error("table '{table}' has non-year column '{label}'")]
    InvalidYearLabel { table: String, label: String },

    /// The same key appears on more than one row.
    #[error("table '{table}' repeats key '{key}'")]
    DuplicateKey { table: String, key: String },

    /// A row carries a different number of cells than there are value columns.
    #[error("row '{key}' in table '{table}' has {found} cells, expected {expected}")]
    RowWidth {
        table: String,
        key: String,
        expected: usize,
        found: usize,
    },
}

/// Why a cell could not be read as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The text is not a decimal number (after removing a magnitude suffix).
    NotANumber,
    /// The text parsed to infinity or NaN.
    NonFinite,
}

/// A single cell failed numeric parsing.
///
/// Callers usually contain this per cell and treat the value as missing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot read '{value}' as a number ({kind:?})")]
pub struct ParseError {
    pub value: String,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(value: impl Into<String>, kind: ParseErrorKind) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }
}

/// Misuse of the joiner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// An inner join needs at least two inputs.
    #[error("join needs at least two tables, got {0}")]
    TooFewInputs(usize),

    /// Two inputs carry a metric with the same name.
    #[error("metric '{0}' appears in more than one join input")]
    DuplicateMetric(String),

    /// One input holds the same `(country, year)` twice.
    #[error("join input '{metric}' repeats key ({country}, {year})")]
    DuplicateKey {
        metric: String,
        country: String,
        year: i32,
    },
}

/// Invalid filter parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("unknown metric '{metric}' (available: {available})")]
    UnknownMetric { metric: String, available: String },

    #[error("year range {lo}..={hi} is empty")]
    InvalidRange { lo: i32, hi: i32 },

    #[error("year step must be positive")]
    ZeroStep,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::InvalidYearLabel {
            table: "gdp".to_string(),
            label: "notes".to_string(),
        };
        assert_eq!(err.to_string(), "table 'gdp' has non-year column 'notes'");
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("12x", ParseErrorKind::NotANumber);
        assert_eq!(err.to_string(), "cannot read '12x' as a number (NotANumber)");
    }
}
