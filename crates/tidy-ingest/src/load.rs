//! Table loading: source → DataFrame → [`WideTable`].

use std::collections::BTreeSet;
use std::time::Instant;

use tidy_model::{COUNTRY_COLUMN, WideTable};
use tracing::{info, info_span};

use crate::csv::{MAX_CSV_FILE_SIZE, read_csv_bytes, read_csv_path};
use crate::error::Result;
use crate::fetch::fetch_bytes;
use crate::frame::frame_to_wide_table;
use crate::source::Source;

/// Options controlling how a table is loaded.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Name of the key column.
    pub key_column: String,
    /// Largest accepted source, in bytes.
    pub max_size: u64,
    /// Keys that stand for "no country" and are dropped on load.
    pub placeholder_keys: BTreeSet<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            key_column: COUNTRY_COLUMN.to_string(),
            max_size: MAX_CSV_FILE_SIZE,
            placeholder_keys: BTreeSet::new(),
        }
    }
}

impl LoadOptions {
    #[must_use]
    pub fn with_key_column(mut self, column: impl Into<String>) -> Self {
        self.key_column = column.into();
        self
    }

    #[must_use]
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    #[must_use]
    pub fn with_placeholder_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.placeholder_keys = keys.into_iter().map(Into::into).collect();
        self
    }
}

/// Load a wide table named `name` from `source`.
pub fn load_wide_table(source: &Source, name: &str, options: &LoadOptions) -> Result<WideTable> {
    let span = info_span!("load", table = name, source = %source);
    let _guard = span.enter();
    let start = Instant::now();

    let df = match source {
        Source::Path(path) => read_csv_path(path, options.max_size)?,
        Source::Url(url) => read_csv_bytes(fetch_bytes(url, options.max_size)?, url)?,
    };
    let table = frame_to_wide_table(&df, name, options)?;

    info!(
        rows = table.rows().len(),
        columns = table.columns().len(),
        duration_ms = start.elapsed().as_millis(),
        "table loaded"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = LoadOptions::default();
        assert_eq!(options.key_column, "country");
        assert_eq!(options.max_size, MAX_CSV_FILE_SIZE);
        assert!(options.placeholder_keys.is_empty());
    }

    #[test]
    fn test_builder() {
        let options = LoadOptions::default()
            .with_key_column("geo")
            .with_max_size(10)
            .with_placeholder_keys(["undefined", "World"]);
        assert_eq!(options.key_column, "geo");
        assert_eq!(options.max_size, 10);
        assert!(options.placeholder_keys.contains("World"));
    }
}
