//! HTTP route entry point for `/api/...`.
//!
//! Route groups include:
//! - `/health` → Health check endpoint
//! - `/grade-report` → Marksheet export and JSON summary for one assignment

use crate::routes::{grade_report::grade_report_routes, health::health_routes};
use crate::state::AppState;
use axum::Router;

pub mod grade_report;
pub mod health;

/// Builds the complete application router for all HTTP endpoints.
///
/// The returned router is already bound to `app_state`, so callers only need
/// to nest it under `/api`.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/grade-report", grade_report_routes())
        .with_state(app_state)
}
