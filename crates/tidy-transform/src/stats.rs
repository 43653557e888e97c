//! Small summaries used to parameterize pages and chart overlays.

use serde::Serialize;
use tidy_model::{FilterError, Observation, RecordSet};

/// Smallest and largest year in `set`, `None` when empty.
pub fn year_bounds<S: RecordSet>(set: &S) -> Option<(i32, i32)> {
    let mut years = set.records().iter().map(Observation::year);
    let first = years.next()?;
    Some(years.fold((first, first), |(lo, hi), year| (lo.min(year), hi.max(year))))
}

/// Latest year at or below `cap` that has at least one record.
pub fn latest_year<S: RecordSet>(set: &S, cap: Option<i32>) -> Option<i32> {
    set.records()
        .iter()
        .map(Observation::year)
        .filter(|year| cap.is_none_or(|cap| *year <= cap))
        .max()
}

/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub points: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit `y` on `x` over points where both are present.
///
/// Returns `None` for fewer than two points or when every `x` is equal.
pub fn linear_fit(points: &[(f64, f64)]) -> Option<LinearFit> {
    let n = points.len();
    if n < 2 {
        return None;
    }
    let count = n as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / count;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / count;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in points {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    // A flat y is fitted exactly by a flat line.
    let r_squared = if syy == 0.0 {
        1.0
    } else {
        (sxy * sxy) / (sxx * syy)
    };
    Some(LinearFit {
        slope,
        intercept,
        r_squared,
        points: n,
    })
}

/// Fit `y_metric` on `x_metric` across the records of `set`.
pub fn fit_metrics<S: RecordSet>(
    set: &S,
    x_metric: &str,
    y_metric: &str,
) -> Result<Option<LinearFit>, FilterError> {
    let position = |metric: &str| {
        set.metric_position(metric)
            .ok_or_else(|| FilterError::UnknownMetric {
                metric: metric.to_string(),
                available: set.metrics().join(", "),
            })
    };
    let (x_pos, y_pos) = (position(x_metric)?, position(y_metric)?);
    let points: Vec<(f64, f64)> = set
        .records()
        .iter()
        .filter_map(|record| {
            let values = record.values();
            Some((values[x_pos]?, values[y_pos]?))
        })
        .collect();
    Ok(linear_fit(&points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidy_model::{JoinedRecord, JoinedTable, LongRecord, LongTable};

    #[test]
    fn test_year_bounds() {
        let set = LongTable::new(
            "v",
            vec![
                LongRecord::new("A", 1990, None),
                LongRecord::new("A", 1850, None),
                LongRecord::new("B", 2024, None),
            ],
        );
        assert_eq!(year_bounds(&set), Some((1850, 2024)));
        assert_eq!(latest_year(&set, Some(2000)), Some(1990));
        assert_eq!(latest_year(&set, None), Some(2024));
        assert_eq!(year_bounds(&LongTable::new("v", vec![])), None);
    }

    #[test]
    fn test_linear_fit_exact_line() {
        let fit = linear_fit(&[(1.0, 3.0), (2.0, 5.0), (3.0, 7.0)]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
        assert_eq!(fit.points, 3);
        assert!((fit.predict(10.0) - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_fit_degenerate() {
        assert!(linear_fit(&[(1.0, 1.0)]).is_none());
        assert!(linear_fit(&[(2.0, 1.0), (2.0, 5.0)]).is_none());
    }

    #[test]
    fn test_fit_metrics_skips_missing() {
        let set = JoinedTable {
            metrics: vec!["gdp".to_string(), "mortality".to_string()],
            records: vec![
                JoinedRecord {
                    country: "A".to_string(),
                    year: 2000,
                    values: vec![Some(1.0), Some(10.0)],
                },
                JoinedRecord {
                    country: "B".to_string(),
                    year: 2000,
                    values: vec![Some(2.0), None],
                },
                JoinedRecord {
                    country: "C".to_string(),
                    year: 2000,
                    values: vec![Some(3.0), Some(6.0)],
                },
            ],
        };
        let fit = fit_metrics(&set, "gdp", "mortality").unwrap().unwrap();
        assert_eq!(fit.points, 2);
        assert!((fit.slope + 2.0).abs() < 1e-12);
        assert!(fit_metrics(&set, "gdp", "income").is_err());
    }
}
