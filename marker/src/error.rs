//! Marker Error Types
//!
//! This module defines the [`MarkerError`] enum, which covers every failure the
//! marksheet pipeline can hit: finding the student behind a report, parsing the
//! report itself, talking to the report store, and rendering the spreadsheet.
//!
//! Identity and parse failures are scoped to a single report and the pipeline
//! skips that report ([`MarkerError::is_report_error`]). Storage and
//! serialization failures end the whole run.
//!
//! # Example
//!
//! ```rust
//! use marker::error::MarkerError;
//!
//! let err = MarkerError::NoIdentityFound("lab1/result.xml".to_string());
//! assert!(err.is_report_error());
//! assert_eq!(err.to_string(), "no student identity found in `lab1/result.xml`");
//! ```

use thiserror::Error;

/// Represents all error types that can occur in the marker system.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarkerError {
    /// The report's location has no email-shaped substring.
    #[error("no student identity found in `{0}`")]
    NoIdentityFound(String),
    /// The report is not well-formed XML (or not valid UTF-8).
    #[error("malformed report: {0}")]
    MalformedReport(String),
    /// A test-case node is missing a required attribute.
    #[error("test-case is missing required attribute `{0}`")]
    MissingAttribute(String),
    /// The same test-case name appears twice in one report.
    #[error("duplicate test-case `{0}` in report")]
    DuplicateTestCase(String),
    /// The report store could not list or read reports.
    #[error("report store failure: {0}")]
    Storage(String),
    /// The marksheet could not be written out.
    #[error("failed to serialize marksheet: {0}")]
    SerializationFailure(String),
}

impl MarkerError {
    /// True for failures confined to one report, which the pipeline logs and
    /// skips instead of aborting.
    pub fn is_report_error(&self) -> bool {
        matches!(
            self,
            MarkerError::NoIdentityFound(_)
                | MarkerError::MalformedReport(_)
                | MarkerError::MissingAttribute(_)
                | MarkerError::DuplicateTestCase(_)
        )
    }
}

impl From<util::report_store::StoreError> for MarkerError {
    fn from(err: util::report_store::StoreError) -> Self {
        MarkerError::Storage(err.0)
    }
}
