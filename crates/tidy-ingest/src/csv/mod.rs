//! CSV reading utilities.

mod reader;

pub use reader::{MAX_CSV_FILE_SIZE, normalize_header, read_csv_bytes, read_csv_path};
