//! Data model for the tidy observatory pipeline.
//!
//! - [`WideTable`]: one row per country, one column per year, raw cells.
//! - [`LongTable`]: one [`LongRecord`] per `(country, year)` cell.
//! - [`JoinedTable`]: several metrics per `(country, year)` after an inner join.

pub mod error;
pub mod record;
pub mod wide;

pub use error::{FilterError, JoinError, ParseError, ParseErrorKind, SchemaError};
pub use record::{
    JoinOutcome, JoinedRecord, JoinedTable, LongRecord, LongTable, Observation, RecordSet,
};
pub use wide::{CellValue, WideRow, WideTable};

/// Default key column of every source table.
pub const COUNTRY_COLUMN: &str = "country";
