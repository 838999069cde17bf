#[cfg(test)]
mod tests {
    use crate::helpers::{make_test_app, send};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn health_check_reports_backend() {
        let app = make_test_app();
        let (status, json) = send(&app, "GET", "/api/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["status"], "OK");
        assert_eq!(json["data"]["backend"], "local");
        assert_eq!(json["message"], "Health check passed");
    }
}
