//! Report storage collaborator.
//!
//! The grading engine never talks to a storage backend directly. It asks a
//! [`ReportStore`] for the reports of one assignment and then fetches each
//! report's raw bytes on demand. [`FsReportStore`] is the filesystem-backed
//! implementation used by the API server, laid out as
//! `{root}/{assignment}/.../<anything containing the student email>/...`.

use crate::paths::{assignment_dir, is_safe_relative, relative_location};
use async_trait::async_trait;
use thiserror::Error;
use std::path::PathBuf;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// One addressable report inside a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDescriptor {
    /// Store-relative location, `/`-separated. The student identity is
    /// extracted from this string.
    pub location: String,
}

impl ReportDescriptor {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

/// Failure raised by a report store while listing or reading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct StoreError(pub String);

/// Lists and reads raw test-run reports for an assignment.
///
/// The assignment key is opaque to callers; each store decides how it maps
/// onto its own namespace.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// List every report filed under `assignment`.
    async fn list(&self, assignment: &str) -> Result<Vec<ReportDescriptor>, StoreError>;

    /// Read the raw content of one listed report.
    async fn fetch(&self, report: &ReportDescriptor) -> Result<Vec<u8>, StoreError>;
}

/// A [`ReportStore`] backed by a directory tree.
#[derive(Debug, Clone)]
pub struct FsReportStore {
    root: PathBuf,
}

impl FsReportStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at the configured `REPORT_STORAGE_ROOT`.
    pub fn from_config() -> Self {
        Self::new(crate::paths::storage_root())
    }
}

#[async_trait]
impl ReportStore for FsReportStore {
    async fn list(&self, assignment: &str) -> Result<Vec<ReportDescriptor>, StoreError> {
        if !is_safe_relative(assignment) {
            return Err(StoreError(format!("invalid assignment key `{assignment}`")));
        }

        let root = self.root.clone();
        let dir = assignment_dir(&root, assignment);
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "assignment directory missing, nothing to list");
            return Ok(Vec::new());
        }

        // walkdir is blocking; keep it off the async workers.
        tokio::task::spawn_blocking(move || {
            let mut out = Vec::new();
            for entry in WalkDir::new(&dir).sort_by_file_name() {
                let entry = entry.map_err(|e| StoreError(format!("walk {}: {e}", dir.display())))?;
                if !entry.file_type().is_file() {
                    continue;
                }
                match relative_location(&root, entry.path()) {
                    Some(location) => out.push(ReportDescriptor { location }),
                    None => warn!(
                        path = %entry.path().display(),
                        "skipping report with a non UTF-8 path"
                    ),
                }
            }
            Ok(out)
        })
        .await
        .map_err(|e| StoreError(format!("listing task failed: {e}")))?
    }

    async fn fetch(&self, report: &ReportDescriptor) -> Result<Vec<u8>, StoreError> {
        if !is_safe_relative(&report.location) {
            return Err(StoreError(format!(
                "invalid report location `{}`",
                report.location
            )));
        }
        let path = self.root.join(&report.location);
        tokio::fs::read(&path)
            .await
            .map_err(|e| StoreError(format!("read {}: {e}", path.display())))
    }
}
