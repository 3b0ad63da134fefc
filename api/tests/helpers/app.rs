use api::middleware::log_request;
use api::routes::routes;
use api::state::AppState;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::Request,
    middleware::from_fn,
    response::Response,
};
use marker::GradeOptions;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;
use util::report_store::FsReportStore;

/// Router over a filesystem store rooted at `root`, with default grading options.
pub fn make_test_app(root: &Path) -> Router {
    let state = AppState::new(Arc::new(FsReportStore::new(root)), GradeOptions::default());
    Router::new()
        .nest("/api", routes(state))
        .layer(from_fn(log_request))
}

pub async fn get(app: Router, uri: &str) -> Response {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(req).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}
