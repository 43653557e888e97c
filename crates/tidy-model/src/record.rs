//! Long-format and joined record sets.
//!
//! A [`LongTable`] holds one metric per `(country, year)` observation. A
//! [`JoinedTable`] holds several metrics per observation, aligned with its
//! `metrics` list. Both implement [`RecordSet`] so the filter stage can work
//! on either.

use serde::{Deserialize, Serialize};

/// Anything observed for a country in a year.
pub trait Observation {
    fn country(&self) -> &str;
    fn year(&self) -> i32;
    /// Metric values, positionally aligned with the owning set's metrics.
    fn values(&self) -> &[Option<f64>];
}

/// A collection of observations with named metrics.
pub trait RecordSet {
    type Record: Observation + Clone;

    /// Metric names, in the same order as [`Observation::values`].
    fn metrics(&self) -> Vec<&str>;
    fn records(&self) -> &[Self::Record];
    fn records_mut(&mut self) -> &mut Vec<Self::Record>;

    fn len(&self) -> usize {
        self.records().len()
    }

    fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// Position of `metric` in [`RecordSet::metrics`].
    fn metric_position(&self, metric: &str) -> Option<usize> {
        self.metrics().iter().position(|name| *name == metric)
    }
}

/// `(country, year, value)` produced from one wide table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongRecord {
    pub country: String,
    pub year: i32,
    pub value: Option<f64>,
}

impl LongRecord {
    pub fn new(country: impl Into<String>, year: i32, value: Option<f64>) -> Self {
        Self {
            country: country.into(),
            year,
            value,
        }
    }
}

impl Observation for LongRecord {
    fn country(&self) -> &str {
        &self.country
    }

    fn year(&self) -> i32 {
        self.year
    }

    fn values(&self) -> &[Option<f64>] {
        std::slice::from_ref(&self.value)
    }
}

/// Long-format records for a single metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongTable {
    pub metric: String,
    pub records: Vec<LongRecord>,
}

impl LongTable {
    pub fn new(metric: impl Into<String>, records: Vec<LongRecord>) -> Self {
        Self {
            metric: metric.into(),
            records,
        }
    }
}

impl RecordSet for LongTable {
    type Record = LongRecord;

    fn metrics(&self) -> Vec<&str> {
        vec![self.metric.as_str()]
    }

    fn records(&self) -> &[LongRecord] {
        &self.records
    }

    fn records_mut(&mut self) -> &mut Vec<LongRecord> {
        &mut self.records
    }
}

/// `(country, year, metric_1, metric_2, ...)` surviving an inner join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRecord {
    pub country: String,
    pub year: i32,
    pub values: Vec<Option<f64>>,
}

impl Observation for JoinedRecord {
    fn country(&self) -> &str {
        &self.country
    }

    fn year(&self) -> i32 {
        self.year
    }

    fn values(&self) -> &[Option<f64>] {
        &self.values
    }
}

/// Joined records with their metric names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedTable {
    pub metrics: Vec<String>,
    pub records: Vec<JoinedRecord>,
}

impl JoinedTable {
    /// Value of `metric` on `record`, `None` when unknown or missing.
    pub fn value(&self, record: &JoinedRecord, metric: &str) -> Option<f64> {
        let position = self.metric_position(metric)?;
        record.values.get(position).copied().flatten()
    }
}

impl From<LongTable> for JoinedTable {
    fn from(table: LongTable) -> Self {
        let records = table
            .records
            .into_iter()
            .map(|record| JoinedRecord {
                country: record.country,
                year: record.year,
                values: vec![record.value],
            })
            .collect();
        Self {
            metrics: vec![table.metric],
            records,
        }
    }
}

impl RecordSet for JoinedTable {
    type Record = JoinedRecord;

    fn metrics(&self) -> Vec<&str> {
        self.metrics.iter().map(String::as_str).collect()
    }

    fn records(&self) -> &[JoinedRecord] {
        &self.records
    }

    fn records_mut(&mut self) -> &mut Vec<JoinedRecord> {
        &mut self.records
    }
}

/// Result of an inner join.
///
/// `Empty` is a normal outcome (no overlapping keys), kept apart from errors
/// so callers can show an empty state instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinOutcome {
    Matched(JoinedTable),
    Empty { metrics: Vec<String> },
}

impl JoinOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    pub fn matched(&self) -> Option<&JoinedTable> {
        match self {
            Self::Matched(table) => Some(table),
            Self::Empty { .. } => None,
        }
    }

    /// Converts to a table, empty when nothing matched.
    pub fn into_table(self) -> JoinedTable {
        match self {
            Self::Matched(table) => table,
            Self::Empty { metrics } => JoinedTable {
                metrics,
                records: Vec::new(),
            },
        }
    }
}
