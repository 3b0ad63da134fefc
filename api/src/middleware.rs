use axum::{
    body::Body,
    http::{Method, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::info;

/// Logs method, path, status and latency for every non-preflight request.
pub async fn log_request(req: Request<Body>, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return next.run(req).await;
    }

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    info!(
        method = ?method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Handled request"
    );
    response
}
