//! # Types Module
//!
//! This module defines the core data structures that flow through the marksheet
//! pipeline: per-report outcomes, per-student cumulative scores and the
//! insertion-ordered collection of students built by the aggregator.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Outcome of every test case in one report: test name → 1 (passed) or 0.
pub type ReportOutcomeMap = BTreeMap<String, u8>;

/// Cumulative score per test name for one student across all their reports.
pub type AggregatedOutcomeMap = BTreeMap<String, u32>;

/// One student's cumulative scores.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StudentRecord {
    /// Case-normalized email of the student.
    pub identity: String,
    /// Summed outcome per test name.
    pub scores: AggregatedOutcomeMap,
}

impl StudentRecord {
    pub fn new(identity: impl Into<String>, scores: AggregatedOutcomeMap) -> Self {
        Self {
            identity: identity.into(),
            scores,
        }
    }

    /// Sum of every score held for this student.
    pub fn total(&self) -> u32 {
        self.scores.values().sum()
    }

    /// Score for `test`, zero when the student has no entry for it.
    pub fn score(&self, test: &str) -> u32 {
        self.scores.get(test).copied().unwrap_or(0)
    }
}

/// Every student seen during a fold, in order of first encounter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationResult {
    records: Vec<StudentRecord>,
    index: HashMap<String, usize>,
}

impl AggregationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a student by (already normalized) identity.
    pub fn get(&self, identity: &str) -> Option<&StudentRecord> {
        self.index.get(identity).map(|&i| &self.records[i])
    }

    /// Students in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = &StudentRecord> {
        self.records.iter()
    }

    /// Distinct test names across all students, ascending.
    pub fn test_catalog(&self) -> Vec<String> {
        let names: BTreeSet<&String> = self.records.iter().flat_map(|r| r.scores.keys()).collect();
        names.into_iter().cloned().collect()
    }

    /// Sum `outcomes` into the record for `identity`, creating it on first sight.
    pub(crate) fn absorb(&mut self, identity: String, outcomes: ReportOutcomeMap) {
        match self.index.get(&identity) {
            Some(&i) => {
                let scores = &mut self.records[i].scores;
                for (test, outcome) in outcomes {
                    *scores.entry(test).or_insert(0) += u32::from(outcome);
                }
            }
            None => {
                let scores = outcomes
                    .into_iter()
                    .map(|(test, outcome)| (test, u32::from(outcome)))
                    .collect();
                self.index.insert(identity.clone(), self.records.len());
                self.records.push(StudentRecord::new(identity, scores));
            }
        }
    }
}

/// Serializes as an ordered JSON object: identity → { test → score }.
impl Serialize for AggregationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(&record.identity, &record.scores)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcomes(pairs: &[(&str, u8)]) -> ReportOutcomeMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn absorb_keeps_first_seen_order() {
        let mut acc = AggregationResult::new();
        acc.absorb("zoe@school.org".into(), outcomes(&[("T1", 1)]));
        acc.absorb("amy@school.org".into(), outcomes(&[("T1", 0)]));
        acc.absorb("zoe@school.org".into(), outcomes(&[("T2", 1)]));

        let order: Vec<&str> = acc.iter().map(|r| r.identity.as_str()).collect();
        assert_eq!(order, vec!["zoe@school.org", "amy@school.org"]);
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn failed_tests_are_kept_as_zero() {
        let mut acc = AggregationResult::new();
        acc.absorb("amy@school.org".into(), outcomes(&[("T1", 0)]));
        let rec = acc.get("amy@school.org").unwrap();
        assert_eq!(rec.scores.get("T1"), Some(&0));
        assert_eq!(rec.total(), 0);
        assert_eq!(rec.score("missing"), 0);
    }

    #[test]
    fn catalog_is_sorted_union() {
        let mut acc = AggregationResult::new();
        acc.absorb("a@school.org".into(), outcomes(&[("b", 1), ("a", 1)]));
        acc.absorb("b@school.org".into(), outcomes(&[("c", 0), ("a", 0)]));
        assert_eq!(acc.test_catalog(), vec!["a", "b", "c"]);
    }

    #[test]
    fn serializes_as_ordered_object() {
        let mut acc = AggregationResult::new();
        acc.absorb("zoe@school.org".into(), outcomes(&[("T1", 1)]));
        acc.absorb("amy@school.org".into(), outcomes(&[("T2", 0)]));
        let json = serde_json::to_string(&acc).unwrap();
        assert_eq!(json, r#"{"zoe@school.org":{"T1":1},"amy@school.org":{"T2":0}}"#);
    }
}
