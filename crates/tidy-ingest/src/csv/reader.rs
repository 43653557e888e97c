//! CSV reading into Polars DataFrames.
//!
//! Every column is read as text. Numeric interpretation happens per cell in
//! the transform stage so that suffixed values such as `"1.2B"` and stray
//! non-numeric cells never make the whole file fail to parse.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Maximum size of a CSV source (100 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 100 * 1024 * 1024;

fn open_error(path: &Path, err: std::io::Error) -> IngestError {
    if err.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: err,
        }
    }
}

/// Check file size against a limit, rejecting empty files.
pub fn check_file_size(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| open_error(path, e))?;

    if metadata.len() == 0 {
        return Err(IngestError::EmptyCsv {
            origin: path.display().to_string(),
        });
    }
    if metadata.len() > max_size {
        return Err(IngestError::TooLarge {
            origin: path.display().to_string(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Reject UTF-16 byte order marks. A UTF-8 BOM is acceptable.
pub fn check_bom(head: &[u8], origin: &str) -> Result<()> {
    let encoding = match head {
        [0xFF, 0xFE, ..] => "UTF-16 LE",
        [0xFE, 0xFF, ..] => "UTF-16 BE",
        _ => return Ok(()),
    };
    Err(IngestError::UnsupportedEncoding {
        origin: origin.to_string(),
        encoding,
    })
}

/// Detect encoding of a file from its first bytes.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| open_error(path, e))?;

    let mut buffer = [0u8; 4];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    check_bom(&buffer[..bytes_read], &path.display().to_string())
}

/// Normalizes a header by removing a UTF-8 BOM and surrounding whitespace.
pub fn normalize_header(value: &str) -> String {
    value.trim_start_matches('\u{feff}').trim().to_string()
}

fn read_options() -> CsvReadOptions {
    // Schema length 0 reads every column as String.
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
}

/// Reads a CSV file into a DataFrame of string columns.
pub fn read_csv_path(path: &Path, max_size: u64) -> Result<DataFrame> {
    check_file_size(path, max_size)?;
    validate_encoding(path)?;

    let parse_error = |e: PolarsError| IngestError::CsvParse {
        origin: path.display().to_string(),
        message: e.to_string(),
    };
    read_options()
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(parse_error)?
        .finish()
        .map_err(parse_error)
}

/// Reads CSV content already held in memory (e.g. an HTTP body).
pub fn read_csv_bytes(bytes: Vec<u8>, origin: &str) -> Result<DataFrame> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(IngestError::EmptyCsv {
            origin: origin.to_string(),
        });
    }
    check_bom(&bytes, origin)?;

    read_options()
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| IngestError::CsvParse {
            origin: origin.to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_csv_path_as_strings() {
        let file = create_temp_csv("country,2000,2001\nChad,1.2M,1.3M\nPeru,27M,\n");
        let df = read_csv_path(file.path(), MAX_CSV_FILE_SIZE).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        for column in df.get_columns() {
            assert_eq!(column.dtype(), &DataType::String);
        }
    }

    #[test]
    fn test_read_csv_bytes() {
        let df = read_csv_bytes(b"country,1990\nChad,210\n".to_vec(), "memory").unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let bytes = b"country,2000\nCh\xffad,1\n".to_vec();
        let result = read_csv_bytes(bytes, "memory");
        assert!(matches!(
            result,
            Err(IngestError::CsvParse { ref origin, .. }) if origin == "memory"
        ));
    }

    #[test]
    fn test_empty_file_rejected() {
        let file = create_temp_csv("");
        let result = read_csv_path(file.path(), MAX_CSV_FILE_SIZE);
        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));

        let result = read_csv_bytes(b"  \n".to_vec(), "memory");
        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = read_csv_path(Path::new("/nonexistent/pop.csv"), MAX_CSV_FILE_SIZE);
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_size_limit() {
        let file = create_temp_csv("country,2000\nChad,1\n");
        let result = read_csv_path(file.path(), 4);
        assert!(matches!(result, Err(IngestError::TooLarge { max_size: 4, .. })));
    }

    #[test]
    fn test_utf16_rejected() {
        let result = check_bom(&[0xFF, 0xFE, 0x63, 0x00], "memory");
        assert!(matches!(
            result,
            Err(IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
                ..
            })
        ));
        assert!(check_bom(&[0xEF, 0xBB, 0xBF, b'c'], "memory").is_ok());
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("\u{feff}country"), "country");
        assert_eq!(normalize_header("  1800 "), "1800");
    }
}
