//! Grade report routes.
//!
//! - `GET /grade-report?assignment=` → `.xlsx` marksheet download
//! - `GET /grade-report/summary?assignment=` → the same marks as JSON

use crate::state::AppState;
use axum::{Router, routing::get};

pub mod get;

pub fn grade_report_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::export_marksheet))
        .route("/summary", get(get::summarize_marks))
}
