//! # Aggregator Module
//!
//! Folds per-report outcomes into one cumulative record per student.
//!
//! [`fold_report`] is a pure reduction step: it takes the accumulator by value,
//! merges one `(identity, outcomes)` pair into it and hands it back. Identities
//! are trimmed and lower-cased here, so `Bob@School.org` and `bob@school.org`
//! land on the same row. Scores for a test name are summed across reports, so
//! the final numbers do not depend on report order; the row order of the
//! result is first-encounter order and does.

use crate::types::{AggregationResult, ReportOutcomeMap};

/// Canonical form of a student identity used as the aggregation key.
pub fn normalize_identity(identity: &str) -> String {
    identity.trim().to_lowercase()
}

/// Merge one report into the accumulator and return it.
///
/// A new identity takes `outcomes` as its initial scores; a known identity has
/// matching test names summed and new test names inserted.
pub fn fold_report(
    mut acc: AggregationResult,
    (identity, outcomes): (String, ReportOutcomeMap),
) -> AggregationResult {
    acc.absorb(normalize_identity(&identity), outcomes);
    acc
}

/// Aggregate a sequence of `(identity, outcomes)` pairs.
///
/// # Example
///
/// ```
/// use marker::aggregator::aggregate;
/// use marker::types::ReportOutcomeMap;
///
/// let r1: ReportOutcomeMap = [("T1".to_string(), 1)].into();
/// let r2: ReportOutcomeMap = [("T1".to_string(), 1)].into();
/// let result = aggregate(vec![
///     ("Alice@School.edu".to_string(), r1),
///     ("alice@school.edu".to_string(), r2),
/// ]);
/// assert_eq!(result.get("alice@school.edu").unwrap().score("T1"), 2);
/// ```
pub fn aggregate<I>(reports: I) -> AggregationResult
where
    I: IntoIterator<Item = (String, ReportOutcomeMap)>,
{
    reports
        .into_iter()
        .fold(AggregationResult::new(), fold_report)
}
