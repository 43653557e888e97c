//! Record selection.
//!
//! Each filter takes a record set by value and returns the records it keeps,
//! in their original order unless stated otherwise. Filters compose by
//! sequential application; [`Filter`] describes one step so a chain can be
//! built from user input and applied with [`apply_filters`].

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use tidy_model::{FilterError, Observation, RecordSet};
use tracing::debug;

/// Keep records where `year == year`.
#[must_use]
pub fn year_equals<S: RecordSet>(mut set: S, year: i32) -> S {
    set.records_mut().retain(|record| record.year() == year);
    set
}

/// Keep records where `lo <= year <= hi`.
pub fn year_range<S: RecordSet>(mut set: S, lo: i32, hi: i32) -> Result<S, FilterError> {
    if lo > hi {
        return Err(FilterError::InvalidRange { lo, hi });
    }
    set.records_mut()
        .retain(|record| (lo..=hi).contains(&record.year()));
    Ok(set)
}

/// Keep records whose country is in `countries`.
#[must_use]
pub fn countries<S: RecordSet>(mut set: S, countries: &BTreeSet<String>) -> S {
    set.records_mut()
        .retain(|record| countries.contains(record.country()));
    set
}

/// Drop records whose country is in `excluded`.
#[must_use]
pub fn exclude_countries<S: RecordSet>(mut set: S, excluded: &BTreeSet<String>) -> S {
    set.records_mut()
        .retain(|record| !excluded.contains(record.country()));
    set
}

/// Keep records where `year` is a multiple of `step`.
pub fn year_multiple_of<S: RecordSet>(mut set: S, step: u32) -> Result<S, FilterError> {
    if step == 0 {
        return Err(FilterError::ZeroStep);
    }
    let step = i64::from(step);
    set.records_mut()
        .retain(|record| i64::from(record.year()).rem_euclid(step) == 0);
    Ok(set)
}

/// Keep records where every metric is present.
#[must_use]
pub fn drop_missing<S: RecordSet>(mut set: S) -> S {
    set.records_mut()
        .retain(|record| record.values().iter().all(Option::is_some));
    set
}

fn metric_position<S: RecordSet>(set: &S, metric: &str) -> Result<usize, FilterError> {
    set.metric_position(metric)
        .ok_or_else(|| FilterError::UnknownMetric {
            metric: metric.to_string(),
            available: set.metrics().join(", "),
        })
}

/// Keep the `n` records with the largest `metric`, largest first.
///
/// Ties keep their input order. Records with a missing `metric` are never
/// selected. Asking for more records than exist returns all of them.
pub fn top_n_by<S: RecordSet>(mut set: S, n: usize, metric: &str) -> Result<S, FilterError> {
    let position = metric_position(&set, metric)?;
    let records = set.records_mut();
    records.retain(|record| record.values()[position].is_some());
    records.sort_by(|a, b| descending(a.values()[position], b.values()[position]));
    records.truncate(n);
    Ok(set)
}

fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// One step of a filter chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    YearEquals(i32),
    YearRange { lo: i32, hi: i32 },
    Countries(BTreeSet<String>),
    ExcludeCountries(BTreeSet<String>),
    YearMultipleOf(u32),
    DropMissing,
    TopN { n: usize, metric: String },
}

impl Filter {
    /// Apply this step to `set`.
    pub fn apply<S: RecordSet>(&self, set: S) -> Result<S, FilterError> {
        let before = set.len();
        let filtered = match self {
            Self::YearEquals(year) => year_equals(set, *year),
            Self::YearRange { lo, hi } => year_range(set, *lo, *hi)?,
            Self::Countries(selected) => countries(set, selected),
            Self::ExcludeCountries(excluded) => exclude_countries(set, excluded),
            Self::YearMultipleOf(step) => year_multiple_of(set, *step)?,
            Self::DropMissing => drop_missing(set),
            Self::TopN { n, metric } => top_n_by(set, *n, metric)?,
        };
        debug!(filter = %self, before, after = filtered.len(), "applied filter");
        Ok(filtered)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::YearEquals(year) => write!(f, "year == {year}"),
            Self::YearRange { lo, hi } => write!(f, "{lo} <= year <= {hi}"),
            Self::Countries(selected) => write!(f, "country in {} selected", selected.len()),
            Self::ExcludeCountries(excluded) => {
                write!(f, "country not in {} excluded", excluded.len())
            }
            Self::YearMultipleOf(step) => write!(f, "year % {step} == 0"),
            Self::DropMissing => write!(f, "all metrics present"),
            Self::TopN { n, metric } => write!(f, "top {n} by {metric}"),
        }
    }
}

/// Apply `filters` in order.
pub fn apply_filters<S: RecordSet>(set: S, filters: &[Filter]) -> Result<S, FilterError> {
    filters.iter().try_fold(set, |set, filter| filter.apply(set))
}
