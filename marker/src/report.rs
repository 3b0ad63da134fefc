//! # Grade Run Report Module
//!
//! This module defines the result of grading one assignment and the serializable
//! summary returned to API clients.
//!
//! ## Overview
//!
//! - [`GradeRun`]: Everything a grading job produced: the aggregated scores, the
//!   rendered [`Marksheet`] and the reports that had to be skipped.
//! - [`GradeSummary`]: A JSON-friendly view of a [`GradeRun`].
//!
//! ## JSON Output Example
//!
//! ```json
//! {
//!   "assignment": "lab1",
//!   "generated_at": "2025-03-01T09:30:00+00:00",
//!   "reports_seen": 3,
//!   "header": ["Email", "Total", "T1", "T2"],
//!   "rows": [
//!     { "identity": "alice@school.edu", "total": 2, "scores": [1, 1] }
//!   ],
//!   "skipped": [
//!     { "location": "lab1/anonymous/result.xml", "reason": "no student identity found in `lab1/anonymous/result.xml`" }
//!   ]
//! }
//! ```

use crate::marksheet::{Marksheet, MarksheetRow};
use crate::types::AggregationResult;
use chrono::Utc;
use serde::Serialize;

/// A report left out of the aggregation, with the reason it was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedReport {
    pub location: String,
    pub reason: String,
}

/// Output of one grading job.
#[derive(Debug, Clone)]
pub struct GradeRun {
    pub assignment: String,
    /// Number of reports the store listed.
    pub reports_seen: usize,
    pub aggregation: AggregationResult,
    pub marksheet: Marksheet,
    pub skipped: Vec<SkippedReport>,
}

/// Serializable view of a [`GradeRun`] for API output.
#[derive(Debug, Serialize)]
pub struct GradeSummary {
    pub assignment: String,
    /// RFC 3339 time the summary was built.
    pub generated_at: String,
    pub reports_seen: usize,
    pub header: Vec<String>,
    pub rows: Vec<MarksheetRow>,
    pub skipped: Vec<SkippedReport>,
}

impl From<&GradeRun> for GradeSummary {
    fn from(run: &GradeRun) -> Self {
        GradeSummary {
            assignment: run.assignment.clone(),
            generated_at: Utc::now().to_rfc3339(),
            reports_seen: run.reports_seen,
            header: run.marksheet.header(),
            rows: run.marksheet.rows.clone(),
            skipped: run.skipped.clone(),
        }
    }
}
