use crate::response::{ApiResponse, error_response};
use crate::state::AppState;
use axum::{
    Json,
    body::Body,
    extract::{Query, State},
    http::{
        HeaderValue, StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use marker::GradingJob;
use marker::report::{GradeRun, GradeSummary};
use marker::writers::xlsx::XLSX_CONTENT_TYPE;
use serde::Deserialize;
use tracing::error;
use util::paths::is_safe_relative;

/// Number of reports left out of the marksheet.
pub const SKIPPED_REPORTS_HEADER: &str = "x-skipped-reports";

#[derive(Debug, Deserialize)]
pub struct GradeReportQuery {
    pub assignment: Option<String>,
}

/// Validates the query and grades the assignment, or returns the error response.
async fn grade(state: &AppState, query: GradeReportQuery) -> Result<GradeRun, Response> {
    let assignment = match query.assignment.as_deref().map(str::trim) {
        Some(a) if !a.is_empty() => a.to_string(),
        _ => {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                "Query parameter `assignment` is required",
            ));
        }
    };
    if !is_safe_relative(&assignment) {
        return Err(error_response(StatusCode::BAD_REQUEST, "Invalid assignment key"));
    }

    GradingJob::new(assignment.as_str(), state.store())
        .with_options(state.options())
        .run()
        .await
        .map_err(|e| {
            error!(assignment = %assignment, error = %e, "grade report failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load test reports")
        })
}

/// `marks-<assignment>.xlsx`, with anything outside `[A-Za-z0-9._-]` replaced.
fn attachment_name(assignment: &str) -> String {
    let safe: String = assignment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("marks-{safe}.xlsx")
}

/// GET /api/grade-report?assignment={key}
///
/// Grades every report filed under `assignment` and downloads the marksheet as
/// a single-sheet workbook. Reports without an identity or with an unreadable
/// body are skipped; their count is returned in `x-skipped-reports`.
///
/// ### Query Parameters
/// - `assignment` (required): Relative key of the assignment in the report store.
///
/// ### Responses
/// - `200 OK` with `Content-Type: application/vnd.openxmlformats-officedocument.spreadsheetml.sheet`
///   and `Content-Disposition: attachment; filename="marks-<assignment>.xlsx"`
/// - `400 Bad Request` when `assignment` is missing, blank or escapes the store
/// - `500 Internal Server Error`
/// ```json
/// { "success": false, "data": null, "message": "Failed to load test reports" }
/// ```
/// ```json
/// { "success": false, "data": null, "message": "Failed to build marksheet" }
/// ```
pub async fn export_marksheet(
    State(state): State<AppState>,
    Query(query): Query<GradeReportQuery>,
) -> Response {
    match grade(&state, query).await {
        Ok(run) => marksheet_response(&run),
        Err(response) => response,
    }
}

/// Renders `run` as the workbook download, or a 500 when it cannot be written.
fn marksheet_response(run: &GradeRun) -> Response {
    let bytes = match run.marksheet.to_xlsx() {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(assignment = %run.assignment, error = %e, "marksheet serialization failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to build marksheet");
        }
    };

    let content_disposition =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", attachment_name(&run.assignment)))
            .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"marks.xlsx\""));

    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE))
        .header(CONTENT_DISPOSITION, content_disposition)
        .header(SKIPPED_REPORTS_HEADER, run.skipped.len());

    match builder.body(Body::from(bytes)) {
        Ok(resp) => resp,
        Err(e) => {
            error!(error = %e, "marksheet response build error");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to build marksheet")
        }
    }
}

/// GET /api/grade-report/summary?assignment={key}
///
/// Same grading as the export, returned as JSON.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "assignment": "lab1",
///     "generated_at": "2025-03-01T09:30:00+00:00",
///     "reports_seen": 3,
///     "header": ["Email", "Total", "T1"],
///     "rows": [{ "identity": "alice@school.edu", "total": 1, "scores": [1] }],
///     "skipped": []
///   },
///   "message": "Marks summarized successfully"
/// }
/// ```
/// - `400 Bad Request` / `500 Internal Server Error` as for the export
pub async fn summarize_marks(
    State(state): State<AppState>,
    Query(query): Query<GradeReportQuery>,
) -> Response {
    match grade(&state, query).await {
        Ok(run) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                GradeSummary::from(&run),
                "Marks summarized successfully",
            )),
        )
            .into_response(),
        Err(response) => response,
    }
}
