//! Application state shared across Axum route handlers.

use marker::GradeOptions;
use std::sync::Arc;
use util::report_store::{FsReportStore, ReportStore};

/// Central application state shared across the server.
///
/// This includes:
/// - The report store the grading endpoints read from.
/// - The grading options resolved from configuration at start-up.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn ReportStore>,
    options: GradeOptions,
}

impl AppState {
    pub fn new(store: Arc<dyn ReportStore>, options: GradeOptions) -> Self {
        Self { store, options }
    }

    /// State backed by the filesystem store at `REPORT_STORAGE_ROOT`.
    pub fn from_config() -> Self {
        Self::new(
            Arc::new(FsReportStore::from_config()),
            GradeOptions::from_config(),
        )
    }

    pub fn store(&self) -> &dyn ReportStore {
        self.store.as_ref()
    }

    pub fn options(&self) -> GradeOptions {
        self.options
    }
}
