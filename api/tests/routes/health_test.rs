#[cfg(test)]
mod tests {
    use crate::helpers::{body_bytes, get, make_test_app};
    use axum::http::StatusCode;
    use serde_json::Value;
    use tempfile::TempDir;

    #[tokio::test]
    async fn health_check_returns_ok_json() {
        let tmp = TempDir::new().unwrap();
        let response = get(make_test_app(tmp.path()), "/api/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "OK");
        assert_eq!(json["message"], "Health check passed");
    }
}
