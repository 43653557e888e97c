//! Inner join of record sets on `(country, year)`.
//!
//! Keys missing from any input are dropped silently. This is how a page
//! discards countries and years that lack data for one side of a
//! comparison. Output follows the record order of the first input; callers
//! must not depend on it.

use std::collections::{HashMap, HashSet};

use tidy_model::{JoinError, JoinOutcome, JoinedRecord, JoinedTable, LongTable};
use tracing::debug;

type Key<'a> = (&'a str, i32);

/// Index of one input: key → metric values.
fn index_input(table: &JoinedTable) -> Result<HashMap<Key<'_>, &[Option<f64>]>, JoinError> {
    let mut index = HashMap::with_capacity(table.records.len());
    for record in &table.records {
        let key = (record.country.as_str(), record.year);
        if index.insert(key, record.values.as_slice()).is_some() {
            return Err(JoinError::DuplicateKey {
                metric: table.metrics.join("+"),
                country: record.country.clone(),
                year: record.year,
            });
        }
    }
    Ok(index)
}

/// Inner-join two or more tables on `(country, year)`.
///
/// The metrics of the result are the inputs' metrics concatenated in input
/// order. Returns [`JoinOutcome::Empty`] when no key is shared by all inputs.
pub fn inner_join(inputs: &[JoinedTable]) -> Result<JoinOutcome, JoinError> {
    if inputs.len() < 2 {
        return Err(JoinError::TooFewInputs(inputs.len()));
    }

    let mut metrics = Vec::new();
    let mut seen = HashSet::new();
    for table in inputs {
        for metric in &table.metrics {
            if !seen.insert(metric.as_str()) {
                return Err(JoinError::DuplicateMetric(metric.clone()));
            }
            metrics.push(metric.clone());
        }
    }

    let (first, rest) = inputs.split_at(1);
    let first = &first[0];
    // Only checked for repeated keys; the first input drives the output order.
    index_input(first)?;
    let indexes = rest
        .iter()
        .map(index_input)
        .collect::<Result<Vec<_>, _>>()?;

    let mut records = Vec::new();
    for record in &first.records {
        let key = (record.country.as_str(), record.year);
        let mut values = record.values.clone();
        let matched = indexes.iter().all(|index| match index.get(&key) {
            Some(other) => {
                values.extend_from_slice(other);
                true
            }
            None => false,
        });
        if matched {
            records.push(JoinedRecord {
                country: record.country.clone(),
                year: record.year,
                values,
            });
        }
    }

    debug!(
        inputs = inputs.len(),
        metrics = %metrics.join(","),
        matched = records.len(),
        "inner join"
    );
    if records.is_empty() {
        return Ok(JoinOutcome::Empty { metrics });
    }
    Ok(JoinOutcome::Matched(JoinedTable { metrics, records }))
}

/// Inner-join long tables, one metric each.
pub fn join_long(inputs: Vec<LongTable>) -> Result<JoinOutcome, JoinError> {
    let tables: Vec<JoinedTable> = inputs.into_iter().map(JoinedTable::from).collect();
    inner_join(&tables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidy_model::LongRecord;

    fn long(metric: &str, rows: &[(&str, i32, Option<f64>)]) -> LongTable {
        LongTable::new(
            metric,
            rows.iter()
                .map(|(country, year, value)| LongRecord::new(*country, *year, *value))
                .collect(),
        )
    }

    #[test]
    fn test_inner_join_keeps_shared_keys() {
        let mortality = long(
            "mortality",
            &[("Chad", 2000, Some(180.0)), ("Peru", 2000, Some(40.0))],
        );
        let gdp = long(
            "gdp",
            &[("Peru", 2000, Some(7000.0)), ("Mali", 2000, Some(1500.0))],
        );

        let outcome = join_long(vec![mortality, gdp]).unwrap();
        let table = outcome.matched().unwrap();

        assert_eq!(table.metrics, vec!["mortality", "gdp"]);
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].country, "Peru");
        assert_eq!(table.records[0].values, vec![Some(40.0), Some(7000.0)]);
    }

    #[test]
    fn test_inner_join_keeps_null_values() {
        let a = long("a", &[("Chad", 2000, None)]);
        let b = long("b", &[("Chad", 2000, Some(1.0))]);
        let table = join_long(vec![a, b]).unwrap().into_table();
        assert_eq!(table.records[0].values, vec![None, Some(1.0)]);
    }

    #[test]
    fn test_no_overlap_is_empty_outcome() {
        let a = long("a", &[("Chad", 2000, Some(1.0))]);
        let b = long("b", &[("Chad", 2001, Some(2.0))]);

        let outcome = join_long(vec![a, b]).unwrap();
        assert_eq!(
            outcome,
            JoinOutcome::Empty {
                metrics: vec!["a".to_string(), "b".to_string()]
            }
        );
    }

    #[test]
    fn test_three_way_join() {
        let a = long("a", &[("Chad", 2000, Some(1.0)), ("Peru", 2000, Some(2.0))]);
        let b = long("b", &[("Chad", 2000, Some(3.0)), ("Peru", 2000, Some(4.0))]);
        let c = long("c", &[("Peru", 2000, Some(5.0))]);

        let table = join_long(vec![a, b, c]).unwrap().into_table();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].values, vec![Some(2.0), Some(4.0), Some(5.0)]);
    }

    #[test]
    fn test_too_few_inputs() {
        let a = long("a", &[]);
        assert_eq!(join_long(vec![a]), Err(JoinError::TooFewInputs(1)));
    }

    #[test]
    fn test_duplicate_metric_rejected() {
        let a = long("gdp", &[]);
        let b = long("gdp", &[]);
        assert_eq!(
            join_long(vec![a, b]),
            Err(JoinError::DuplicateMetric("gdp".to_string()))
        );
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let a = long("a", &[("Chad", 2000, Some(1.0)), ("Chad", 2000, Some(2.0))]);
        let b = long("b", &[("Chad", 2000, Some(3.0))]);
        assert!(matches!(
            join_long(vec![a, b]),
            Err(JoinError::DuplicateKey { .. })
        ));
    }
}
