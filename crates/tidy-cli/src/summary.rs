//! Terminal rendering of page results as tables.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::export::format_value;
use crate::types::{ChartData, PageOutput};

pub fn print_summary(output: &PageOutput, limit: usize) {
    println!("{}", render_summary(output, limit, true));
}

/// Render every dataset of `output`, at most `limit` rows each.
pub fn render_summary(output: &PageOutput, limit: usize, styled: bool) -> String {
    let mut lines = Vec::new();
    lines.push(match output.year {
        Some(year) => format!("{} ({year})", output.title),
        None => output.title.clone(),
    });

    for data in &output.datasets {
        lines.push(String::new());
        lines.push(format!("{}: {}", data.name, data.chart.title));
        if data.is_empty() {
            lines.push(empty_message(output, data));
            continue;
        }
        lines.push(render_table(data, limit, styled).to_string());
        let shown = data.table.records.len().min(limit);
        if shown < data.table.records.len() {
            lines.push(format!(
                "... {} more rows (use --limit or --output to see all)",
                data.table.records.len() - shown
            ));
        }
        if let Some(fit) = &data.regression {
            lines.push(format!(
                "regression: {} = {:.6} * {} + {:.4} (r² = {:.3}, n = {})",
                data.chart.y.join(", "),
                fit.slope,
                data.chart.x,
                fit.intercept,
                fit.r_squared,
                fit.points
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "{} records across {} dataset(s)",
        output.total_records(),
        output.datasets.len()
    ));
    lines.join("\n")
}

fn empty_message(output: &PageOutput, data: &ChartData) -> String {
    match output.year {
        Some(year) => format!("No data available for {year} in {}.", data.name),
        None => format!("No data available in {}.", data.name),
    }
}

fn render_table(data: &ChartData, limit: usize, styled: bool) -> Table {
    let mut table = Table::new();
    if !styled {
        table.force_no_tty();
    }
    let mut header = vec![header_cell("Country"), header_cell("Year")];
    header.extend(data.table.metrics.iter().map(String::as_str).map(header_cell));
    table.set_header(header);
    apply_table_style(&mut table);
    for index in 1..table.column_count() {
        align_column(&mut table, index, CellAlignment::Right);
    }

    for record in data.table.records.iter().take(limit) {
        let mut row = vec![Cell::new(&record.country), Cell::new(record.year)];
        row.extend(record.values.iter().map(|value| value_cell(*value)));
        table.add_row(row);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn apply_catalog_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(165);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn value_cell(value: Option<f64>) -> Cell {
    match value {
        Some(_) => Cell::new(format_value(value)),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
