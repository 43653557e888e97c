//! Table ingestion for the tidy observatory.
//!
//! Loads comma-separated, wide-format country/year tables (one row per
//! country, one column per year) from a local file or an HTTP URL into a
//! [`tidy_model::WideTable`]. Cells stay raw; numeric parsing is left to
//! `tidy-transform`.
//!
//! # Example
//!
//! ```ignore
//! use tidy_ingest::{LoadOptions, Source, load_wide_table};
//!
//! let source = Source::parse("data/pop.csv");
//! let table = load_wide_table(&source, "population", &LoadOptions::default())?;
//! ```

mod csv;
mod error;
mod fetch;
mod frame;
mod load;
mod source;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{MAX_CSV_FILE_SIZE, read_csv_bytes, read_csv_path};

// === Retrieval ===
pub use fetch::fetch_bytes;
pub use source::Source;

// === Table Loading ===
pub use frame::{any_to_cell, frame_to_wide_table};
pub use load::{LoadOptions, load_wide_table};
