//! Page output types shared by the summary and export writers.

use serde::Serialize;
use tidy_model::{JoinOutcome, JoinedTable, RecordSet};
use tidy_transform::LinearFit;

/// Chart a dataset is meant to feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Choropleth,
    Line,
    DualAxisLine,
    Scatter,
}

/// Rendering hints exported alongside the records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartHints {
    pub kind: ChartKind,
    pub title: String,
    pub x: String,
    pub y: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub log_x: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub regression: bool,
}

impl ChartHints {
    pub fn new(kind: ChartKind, title: impl Into<String>, x: &str, y: &[&str]) -> Self {
        Self {
            kind,
            title: title.into(),
            x: x.to_string(),
            y: y.iter().map(|metric| (*metric).to_string()).collect(),
            color: None,
            log_x: false,
            regression: false,
        }
    }

    #[must_use]
    pub fn with_color(mut self, column: &str) -> Self {
        self.color = Some(column.to_string());
        self
    }

    #[must_use]
    pub fn with_log_x(mut self) -> Self {
        self.log_x = true;
        self
    }

    #[must_use]
    pub fn with_regression(mut self) -> Self {
        self.regression = true;
        self
    }
}

/// One table a page produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub name: String,
    pub chart: ChartHints,
    pub table: JoinedTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regression: Option<LinearFit>,
}

impl ChartData {
    pub fn new(name: impl Into<String>, chart: ChartHints, table: JoinedTable) -> Self {
        Self {
            name: name.into(),
            chart,
            table,
            regression: None,
        }
    }

    pub fn from_outcome(name: impl Into<String>, chart: ChartHints, outcome: JoinOutcome) -> Self {
        Self::new(name, chart, outcome.into_table())
    }

    #[must_use]
    pub fn with_regression(mut self, fit: Option<LinearFit>) -> Self {
        self.regression = fit;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Everything a page run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageOutput {
    pub page: &'static str,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub datasets: Vec<ChartData>,
}

impl PageOutput {
    pub fn total_records(&self) -> usize {
        self.datasets.iter().map(|data| data.table.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.iter().all(ChartData::is_empty)
    }
}
