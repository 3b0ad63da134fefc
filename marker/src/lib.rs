//! # Marker Library
//!
//! This crate turns the automated test-run reports of an assignment into a
//! cumulative marksheet.
//!
//! ## Key Concepts
//! - **GradingJob**: The main struct representing the grading of one assignment.
//! - **Identity**: The student email found in a report's storage location.
//! - **Parsers**: Convert a raw `test-run` report into pass/fail outcomes.
//! - **Aggregation**: Sums outcomes per student and test across resubmissions.
//! - **Marksheet**: A dense students × tests table rendered to `.xlsx`.
//!
//! Reports whose identity or content cannot be read are skipped with a warning;
//! a store or rendering failure fails the whole job.

pub mod aggregator;
pub mod error;
pub mod identity;
pub mod marksheet;
pub mod parsers;
pub mod report;
pub mod traits;
pub mod types;
pub mod writers;

use crate::aggregator::aggregate;
use crate::error::MarkerError;
use crate::identity::extract_identity;
use crate::marksheet::{Marksheet, RowOrder};
use crate::parsers::test_run_parser::{DEFAULT_SUITE_DEPTH, TestRunParser};
use crate::report::{GradeRun, SkippedReport};
use crate::types::ReportOutcomeMap;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};
use util::config::AppConfig;
use util::report_store::{ReportDescriptor, ReportStore};

/// Tunables for a grading job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeOptions {
    /// Nested `test-suite` levels above each `test-case`.
    pub suite_depth: usize,
    /// Reports fetched and parsed at the same time.
    pub concurrency: usize,
    pub row_order: RowOrder,
}

impl Default for GradeOptions {
    fn default() -> Self {
        Self {
            suite_depth: DEFAULT_SUITE_DEPTH,
            concurrency: 8,
            row_order: RowOrder::Identity,
        }
    }
}

impl GradeOptions {
    /// Options taken from the global [`AppConfig`].
    pub fn from_config() -> Self {
        let cfg = AppConfig::global();
        Self {
            suite_depth: cfg.report_suite_depth,
            concurrency: cfg.fetch_concurrency.max(1),
            row_order: RowOrder::from_sort_flag(cfg.marksheet_sort_rows),
        }
    }
}

/// Represents the grading of every report filed under one assignment.
///
/// # Example
///
/// ```no_run
/// use marker::GradingJob;
/// use util::report_store::FsReportStore;
///
/// # async fn run() -> Result<(), marker::error::MarkerError> {
/// let store = FsReportStore::new("data/testresult");
/// let run = GradingJob::new("lab1", &store).run().await?;
/// let bytes = run.marksheet.to_xlsx()?;
/// # Ok(())
/// # }
/// ```
pub struct GradingJob<'a> {
    assignment: String,
    store: &'a dyn ReportStore,
    parser: TestRunParser,
    concurrency: usize,
    row_order: RowOrder,
}

impl<'a> GradingJob<'a> {
    /// Create a job with default options.
    ///
    /// # Arguments
    /// * `assignment` - Opaque key passed to the store's listing.
    /// * `store` - Where the reports live.
    pub fn new(assignment: impl Into<String>, store: &'a dyn ReportStore) -> Self {
        Self {
            assignment: assignment.into(),
            store,
            parser: TestRunParser::default(),
            concurrency: GradeOptions::default().concurrency,
            row_order: GradeOptions::default().row_order,
        }
    }

    /// Apply every field of `options`.
    pub fn with_options(self, options: GradeOptions) -> Self {
        self.with_parser(TestRunParser::with_suite_depth(options.suite_depth))
            .with_concurrency(options.concurrency)
            .with_row_order(options.row_order)
    }

    /// Use a parser configured for a different suite depth.
    pub fn with_parser(mut self, parser: TestRunParser) -> Self {
        self.parser = parser;
        self
    }

    /// Bound the number of reports fetched and parsed concurrently.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_row_order(mut self, row_order: RowOrder) -> Self {
        self.row_order = row_order;
        self
    }

    /// Run the job and build the marksheet.
    ///
    /// # Steps
    /// 1. Lists every report of the assignment.
    /// 2. Extracts the identity, fetches and parses each report (concurrently, bounded).
    /// 3. Folds the outcomes in listing order, skipping unreadable reports.
    /// 4. Builds the marksheet in the configured row order.
    ///
    /// # Errors
    /// Returns [`MarkerError::Storage`] if listing or fetching fails. Identity and
    /// parse failures never surface here; they end up in [`GradeRun::skipped`].
    pub async fn run(self) -> Result<GradeRun, MarkerError> {
        let reports = self.store.list(&self.assignment).await?;
        let reports_seen = reports.len();
        info!(assignment = %self.assignment, reports = reports_seen, "grading assignment");

        let store = self.store;
        let parser = &self.parser;
        let loaded: Vec<(ReportDescriptor, Result<(String, ReportOutcomeMap), MarkerError>)> =
            stream::iter(reports)
                .map(|report| async move {
                    let loaded = load_report(store, parser, &report).await;
                    (report, loaded)
                })
                .buffered(self.concurrency)
                .collect()
                .await;

        let mut parsed = Vec::with_capacity(loaded.len());
        let mut skipped = Vec::new();
        for (report, result) in loaded {
            match result {
                Ok(pair) => parsed.push(pair),
                Err(e) if e.is_report_error() => {
                    warn!(location = %report.location, error = %e, "skipping report");
                    skipped.push(SkippedReport {
                        location: report.location,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        let aggregation = aggregate(parsed);
        if let Ok(json) = serde_json::to_string(&aggregation) {
            debug!(assignment = %self.assignment, marks = %json, "aggregated marks");
        }

        let marksheet = Marksheet::from_aggregation(&aggregation).ordered(self.row_order);
        info!(
            assignment = %self.assignment,
            students = marksheet.rows.len(),
            tests = marksheet.tests.len(),
            skipped = skipped.len(),
            "marksheet built"
        );

        Ok(GradeRun {
            assignment: self.assignment,
            reports_seen,
            aggregation,
            marksheet,
            skipped,
        })
    }
}

/// Identity first, so reports filed without an email are never fetched.
async fn load_report(
    store: &dyn ReportStore,
    parser: &TestRunParser,
    report: &ReportDescriptor,
) -> Result<(String, ReportOutcomeMap), MarkerError> {
    let identity = extract_identity(&report.location)?;
    let raw = store.fetch(report).await?;
    let outcomes = parser.parse_bytes(&raw)?;
    Ok((identity, outcomes))
}
