#[cfg(test)]
mod tests {
    use crate::helpers::{body_bytes, get, make_test_app};
    use api::routes::grade_report::get::SKIPPED_REPORTS_HEADER;
    use api::state::AppState;
    use axum::http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    };
    use axum::Router;
    use marker::writers::xlsx::{XLSX_CONTENT_TYPE, read_sheet_rows};
    use async_trait::async_trait;
    use marker::GradeOptions;
    use serde_json::Value;
    use serial_test::serial;
    use std::io::{Cursor, Read};
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;
    use util::report_store::{ReportDescriptor, ReportStore, StoreError};
    use util::test_helpers::{setup_test_storage_root, test_run_xml, write_report};

    /// alice submits twice, bob once, and one report has no email in its path.
    fn seed_lab1(root: &Path) {
        write_report(
            root,
            "lab1/alice@school.edu/run1/TestResult.xml",
            &test_run_xml(&[("T1", "Passed"), ("T2", "Failed")]),
        );
        write_report(
            root,
            "lab1/alice@school.edu/run2/TestResult.xml",
            &test_run_xml(&[("T1", "Passed"), ("T3", "Passed")]),
        );
        write_report(
            root,
            "lab1/bob@school.edu/run1/TestResult.xml",
            &test_run_xml(&[("T2", "Passed")]),
        );
        write_report(
            root,
            "lab1/anonymous/TestResult.xml",
            &test_run_xml(&[("T1", "Passed")]),
        );
    }

    #[tokio::test]
    async fn export_returns_marksheet_workbook() {
        let tmp = TempDir::new().unwrap();
        seed_lab1(tmp.path());

        let response = get(make_test_app(tmp.path()), "/api/grade-report?assignment=lab1").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], XLSX_CONTENT_TYPE);
        assert_eq!(
            response.headers()[CONTENT_DISPOSITION],
            "attachment; filename=\"marks-lab1.xlsx\""
        );
        assert_eq!(response.headers()[SKIPPED_REPORTS_HEADER], "1");

        let bytes = body_bytes(response).await;
        let rows = read_sheet_rows(&bytes).unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["Email", "Total", "T1", "T2", "T3"],
                vec!["alice@school.edu", "3", "2", "0", "1"],
                vec!["bob@school.edu", "1", "0", "1", "0"],
            ]
        );

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut workbook = String::new();
        archive
            .by_name("xl/workbook.xml")
            .unwrap()
            .read_to_string(&mut workbook)
            .unwrap();
        assert!(workbook.contains(r#"<sheet name="Marks""#));
    }

    #[tokio::test]
    async fn export_of_unknown_assignment_is_header_only() {
        let tmp = TempDir::new().unwrap();

        let response = get(make_test_app(tmp.path()), "/api/grade-report?assignment=lab9").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[SKIPPED_REPORTS_HEADER], "0");

        let rows = read_sheet_rows(&body_bytes(response).await).unwrap();
        assert_eq!(rows, vec![vec!["Email", "Total"]]);
    }

    #[tokio::test]
    async fn export_skips_malformed_reports() {
        let tmp = TempDir::new().unwrap();
        write_report(
            tmp.path(),
            "lab1/amy@school.org/TestResult.xml",
            &test_run_xml(&[("T1", "Passed")]),
        );
        write_report(tmp.path(), "lab1/zed@school.org/TestResult.xml", "<test-run><oops>");

        let response = get(make_test_app(tmp.path()), "/api/grade-report?assignment=lab1").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[SKIPPED_REPORTS_HEADER], "1");

        let rows = read_sheet_rows(&body_bytes(response).await).unwrap();
        assert_eq!(
            rows,
            vec![vec!["Email", "Total", "T1"], vec!["amy@school.org", "1", "1"]]
        );
    }

    async fn assert_bad_request(app: Router, uri: &str) {
        let response = get(app, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn rejects_missing_blank_or_escaping_assignment() {
        let tmp = TempDir::new().unwrap();
        let app = make_test_app(tmp.path());

        assert_bad_request(app.clone(), "/api/grade-report").await;
        assert_bad_request(app.clone(), "/api/grade-report?assignment=").await;
        assert_bad_request(app.clone(), "/api/grade-report?assignment=%20%20").await;
        assert_bad_request(app.clone(), "/api/grade-report?assignment=..%2Fsecrets").await;
        assert_bad_request(app.clone(), "/api/grade-report?assignment=%2Fetc").await;
        assert_bad_request(app, "/api/grade-report/summary").await;
    }

    #[tokio::test]
    async fn summary_returns_marks_as_json() {
        let tmp = TempDir::new().unwrap();
        seed_lab1(tmp.path());

        let response = get(
            make_test_app(tmp.path()),
            "/api/grade-report/summary?assignment=lab1",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Marks summarized successfully");

        let data = &json["data"];
        assert_eq!(data["assignment"], "lab1");
        assert_eq!(data["reports_seen"], 4);
        assert_eq!(data["header"], serde_json::json!(["Email", "Total", "T1", "T2", "T3"]));
        assert_eq!(data["rows"][0]["identity"], "alice@school.edu");
        assert_eq!(data["rows"][0]["scores"], serde_json::json!([2, 0, 1]));
        assert_eq!(data["rows"][1]["identity"], "bob@school.edu");
        assert_eq!(data["rows"][1]["total"], 1);
        assert_eq!(data["skipped"][0]["location"], "lab1/anonymous/TestResult.xml");
    }

    #[tokio::test]
    #[serial]
    async fn state_from_config_reads_storage_root() {
        let tmp = setup_test_storage_root();
        write_report(
            tmp.path(),
            "lab2/amy@school.org/TestResult.xml",
            &test_run_xml(&[("T1", "Passed"), ("T2", "Passed")]),
        );

        let app = Router::new().nest("/api", api::routes::routes(AppState::from_config()));
        let response = get(app, "/api/grade-report/summary?assignment=lab2").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["data"]["rows"][0]["identity"], "amy@school.org");
        assert_eq!(json["data"]["rows"][0]["total"], 2);
    }

    /// Store that fails either the listing or every read.
    struct FailingStore {
        fail_list: bool,
    }

    #[async_trait]
    impl ReportStore for FailingStore {
        async fn list(&self, assignment: &str) -> Result<Vec<ReportDescriptor>, StoreError> {
            if self.fail_list {
                return Err(StoreError("storage offline".into()));
            }
            Ok(vec![ReportDescriptor::new(format!(
                "{assignment}/amy@school.org/TestResult.xml"
            ))])
        }

        async fn fetch(&self, report: &ReportDescriptor) -> Result<Vec<u8>, StoreError> {
            Err(StoreError(format!("cannot read {}", report.location)))
        }
    }

    fn failing_app(fail_list: bool) -> Router {
        let state = AppState::new(Arc::new(FailingStore { fail_list }), GradeOptions::default());
        Router::new().nest("/api", api::routes::routes(state))
    }

    #[tokio::test]
    async fn storage_failures_are_reported_as_load_errors() {
        for fail_list in [true, false] {
            for uri in [
                "/api/grade-report?assignment=lab1",
                "/api/grade-report/summary?assignment=lab1",
            ] {
                let response = get(failing_app(fail_list), uri).await;
                assert_eq!(
                    response.status(),
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "{uri} (fail_list = {fail_list})"
                );
                let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
                assert_eq!(json["success"], false);
                assert_eq!(json["message"], "Failed to load test reports");
            }
        }
    }
}
