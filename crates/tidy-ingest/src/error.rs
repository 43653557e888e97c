//! Error types for table ingestion.

use std::path::PathBuf;

use thiserror::Error;
use tidy_model::SchemaError;

/// Errors that can occur while loading a table.
///
/// All of these are fatal for the page that requested the table.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Network Errors ===
    /// The HTTP request could not be completed.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    // === Content Errors ===
    /// Source exceeds the configured size limit.
    #[error("{origin} is {size} bytes, limit is {max_size}")]
    TooLarge {
        origin: String,
        size: u64,
        max_size: u64,
    },

    /// Source starts with a byte order mark of an unsupported encoding.
    #[error("{origin} is {encoding}, only UTF-8 is supported")]
    UnsupportedEncoding {
        origin: String,
        encoding: &'static str,
    },

    /// CSV file is empty.
    #[error("CSV source is empty: {origin}")]
    EmptyCsv { origin: String },

    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {origin}: {message}")]
    CsvParse { origin: String, message: String },

    // === Shape Errors ===
    /// The table does not have a key column, has repeated keys, etc.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/data/pop.csv"),
        };
        assert_eq!(err.to_string(), "CSV file not found: /data/pop.csv");
    }

    #[test]
    fn test_schema_error_is_transparent() {
        let err: IngestError = SchemaError::MissingKeyColumn {
            table: "gdp".to_string(),
            column: "country".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "table 'gdp' has no key column 'country'");
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
