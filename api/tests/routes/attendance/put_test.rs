#[cfg(test)]
mod tests {
    use super::super::{mark_body, open_session};
    use crate::helpers::{make_test_app, send};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn close_is_idempotent() {
        let app = make_test_app();
        let session = open_session(&app, 15).await;
        let uri = format!("/api/attendance/sessions/{}/close", session["id"].as_str().unwrap());

        for _ in 0..2 {
            let (status, json) = send(&app, "PUT", &uri, None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["success"], true);
        }

        let (status, _) = send(&app, "PUT", "/api/attendance/sessions/missing/close", None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, json) = send(&app, "GET", "/api/attendance/sessions/active", None).await;
        assert!(json["data"].is_null());
    }

    #[tokio::test]
    async fn closed_session_refuses_check_in() {
        let app = make_test_app();
        let session = open_session(&app, 15).await;
        let id = session["id"].as_str().unwrap();

        send(&app, "PUT", &format!("/api/attendance/sessions/{id}/close"), None).await;

        let (status, json) = send(
            &app,
            "POST",
            &format!("/api/attendance/sessions/{id}/mark"),
            Some(mark_body("S101", session["otp"].as_str().unwrap())),
        )
        .await;
        assert_eq!(status, StatusCode::GONE);
        assert_eq!(json["data"]["retryable"], false);
    }

    #[tokio::test]
    async fn opening_again_retires_the_previous_session() {
        let app = make_test_app();
        let first = open_session(&app, 15).await;
        let second = open_session(&app, 15).await;

        let (_, json) = send(&app, "GET", "/api/attendance/sessions/active", None).await;
        assert_eq!(json["data"]["id"], second["id"]);
        assert_ne!(first["id"], second["id"]);
    }
}
