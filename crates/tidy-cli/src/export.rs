//! Export of page results to CSV or JSON, chosen by file extension.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tidy_model::COUNTRY_COLUMN;

use crate::types::{ChartData, PageOutput};

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => bail!(
                "cannot export to {}: expected a .csv or .json extension",
                path.display()
            ),
        }
    }
}

/// Write `output` to `path`, returning the files written.
///
/// JSON holds the whole page. CSV holds one table per file; pages with
/// several tables write `<stem>-<name>.csv` next to `path`.
pub fn write_output(output: &PageOutput, path: &Path) -> Result<Vec<PathBuf>> {
    let written = match ExportFormat::from_path(path)? {
        ExportFormat::Json => {
            let file = File::create(path)
                .with_context(|| format!("create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, output)
                .with_context(|| format!("write {}", path.display()))?;
            writer.flush()?;
            vec![path.to_path_buf()]
        }
        ExportFormat::Csv => {
            let mut written = Vec::with_capacity(output.datasets.len());
            for data in &output.datasets {
                let target = if output.datasets.len() == 1 {
                    path.to_path_buf()
                } else {
                    dataset_path(path, &data.name)
                };
                let file = File::create(&target)
                    .with_context(|| format!("create {}", target.display()))?;
                write_csv(data, file).with_context(|| format!("write {}", target.display()))?;
                written.push(target);
            }
            written
        }
    };
    for path in &written {
        tracing::info!(path = %path.display(), "wrote export");
    }
    Ok(written)
}

fn dataset_path(path: &Path, name: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("output");
    path.with_file_name(format!("{stem}-{name}.csv"))
}

/// Write one table as CSV: `country,year,<metrics...>`, missing values blank.
pub fn write_csv<W: Write>(data: &ChartData, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    let mut header = vec![COUNTRY_COLUMN.to_string(), "year".to_string()];
    header.extend(data.table.metrics.iter().cloned());
    csv.write_record(&header)?;

    for record in &data.table.records {
        let mut row = Vec::with_capacity(header.len());
        row.push(record.country.clone());
        row.push(record.year.to_string());
        row.extend(record.values.iter().map(|value| format_value(*value)));
        csv.write_record(&row)?;
    }
    csv.flush()?;
    Ok(())
}

/// CSV text of one table.
pub fn to_csv_string(data: &ChartData) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(data, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

pub fn format_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
