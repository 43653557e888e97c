//! Subcommand handlers for the `observatory` binary.

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Table};
use tidy_transform::NumericMode;
use tracing::info;

use crate::catalog::{DatasetCatalog, DatasetId};
use crate::cli::{Cli, Command};
use crate::export::write_output;
use crate::pages::{gdp_page, income_page, map_page, population_page, trends_page};
use crate::summary::{apply_catalog_table_style, header_cell, print_summary};
use crate::types::PageOutput;

pub fn load_catalog(path: Option<&Path>) -> Result<DatasetCatalog> {
    match path {
        Some(path) => DatasetCatalog::load(path),
        None => Ok(DatasetCatalog::default()),
    }
}

/// Run the page selected by `command`.
///
/// Returns `None` for commands that do not produce a page.
pub fn run_page(catalog: &DatasetCatalog, command: &Command) -> Result<Option<PageOutput>> {
    let output = match command {
        Command::Map(args) => map_page(catalog, &args.into())?,
        Command::Trends(args) => trends_page(catalog, &args.into())?,
        Command::Population(args) => population_page(catalog, &args.into())?,
        Command::Gdp(args) => gdp_page(catalog, &args.into())?,
        Command::Income(args) => income_page(catalog, &args.into())?,
        Command::Datasets => return Ok(None),
    };
    info!(
        page = output.page,
        records = output.total_records(),
        "page complete"
    );
    Ok(Some(output))
}

pub fn run(cli: &Cli) -> Result<()> {
    let catalog = load_catalog(cli.catalog.as_deref())?;
    let Some(output) = run_page(&catalog, &cli.command)? else {
        print_datasets(&catalog);
        return Ok(());
    };

    print_summary(&output, cli.limit);
    if let Some(path) = &cli.output {
        for written in write_output(&output, path)? {
            println!("Wrote {}", written.display());
        }
    }
    Ok(())
}

pub fn print_datasets(catalog: &DatasetCatalog) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Metric"),
        header_cell("Numbers"),
        header_cell("Source"),
        header_cell("Description"),
    ]);
    apply_catalog_table_style(&mut table);
    for id in DatasetId::ALL {
        let spec = catalog.get(id);
        let numbers = match spec.numeric {
            NumericMode::Plain => "plain",
            NumericMode::Suffixed => "B/M/k",
        };
        table.add_row(vec![
            Cell::new(id),
            Cell::new(&spec.metric),
            Cell::new(numbers),
            Cell::new(&spec.source),
            Cell::new(&spec.description),
        ]);
    }
    println!("{table}");
}
