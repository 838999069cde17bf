#[cfg(test)]
mod tests {
    use super::super::{mark_body, open_session};
    use crate::helpers::{make_test_app, make_test_app_with, send};
    use axum::http::StatusCode;
    use serde_json::json;
    use services::operating_window::OperatingWindow;

    #[tokio::test]
    async fn open_returns_otp_and_qr_payload() {
        let app = make_test_app();
        let session = open_session(&app, 15).await;

        let otp = session["otp"].as_str().unwrap();
        assert_eq!(otp.len(), 6);
        assert!(otp.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(
            session["qr_payload"],
            format!("ATTN:{}:{}", session["id"].as_str().unwrap(), otp)
        );
        assert_eq!(session["subject_name"], "Distributed Systems");
        assert_eq!(session["active"], true);
    }

    #[tokio::test]
    async fn open_rejects_bad_input() {
        let app = make_test_app();

        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance/sessions",
            Some(json!({
                "subject_id": "CS801",
                "department": "Computer Science",
                "faculty_id": "F001",
                "duration_minutes": 0
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["data"]["code"], "INVALID_DURATION");

        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance/sessions",
            Some(json!({
                "subject_id": "ZZ000",
                "department": "Computer Science",
                "faculty_id": "F001",
                "duration_minutes": 10
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["data"]["code"], "UNKNOWN_SUBJECT");
    }

    #[tokio::test]
    async fn mark_commits_once_then_conflicts() {
        let app = make_test_app();
        let session = open_session(&app, 15).await;
        let uri = format!("/api/attendance/sessions/{}/mark", session["id"].as_str().unwrap());
        let otp = session["otp"].as_str().unwrap();

        let (status, json) = send(&app, "POST", &uri, Some(mark_body("S101", otp))).await;
        assert_eq!(status, StatusCode::CREATED, "{json}");
        assert_eq!(json["data"]["status"], "PRESENT");
        assert_eq!(json["data"]["otp_verified"], true);

        let (status, json) = send(&app, "POST", &uri, Some(mark_body("S101", otp))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["success"], false);
        assert_eq!(json["data"]["code"], "DUPLICATE_SUBMISSION");
        assert_eq!(json["data"]["retryable"], false);
    }

    #[tokio::test]
    async fn wrong_otp_is_retryable() {
        let app = make_test_app();
        let session = open_session(&app, 15).await;
        let uri = format!("/api/attendance/sessions/{}/mark", session["id"].as_str().unwrap());
        let wrong = format!("{}0", session["otp"].as_str().unwrap());

        let (status, json) = send(&app, "POST", &uri, Some(mark_body("S101", &wrong))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["data"]["code"], "INVALID_TOKEN");
        assert_eq!(json["data"]["retryable"], true);

        let (status, _) = send(
            &app,
            "POST",
            &uri,
            Some(mark_body("S101", session["otp"].as_str().unwrap())),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn raw_position_outside_campus_is_rejected() {
        let app = make_test_app();
        let session = open_session(&app, 15).await;
        let uri = format!("/api/attendance/sessions/{}/mark", session["id"].as_str().unwrap());

        let mut body = mark_body("S101", session["otp"].as_str().unwrap());
        body["position"] = json!({ "latitude": 13.0827, "longitude": 80.2707 });
        let (status, json) = send(&app, "POST", &uri, Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["data"]["code"], "OUT_OF_BOUNDS");
    }

    #[tokio::test]
    async fn unknown_session_is_gone() {
        let app = make_test_app();
        open_session(&app, 15).await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/attendance/sessions/not-a-session/mark",
            Some(mark_body("S101", "123456")),
        )
        .await;
        assert_eq!(status, StatusCode::GONE);
        assert_eq!(json["data"]["code"], "SESSION_EXPIRED");
    }

    #[tokio::test]
    async fn closed_operating_window_is_gone() {
        let app = make_test_app_with(OperatingWindow::new(0, 0));
        let session = open_session(&app, 15).await;
        let uri = format!("/api/attendance/sessions/{}/mark", session["id"].as_str().unwrap());

        let (status, json) = send(
            &app,
            "POST",
            &uri,
            Some(mark_body("S101", session["otp"].as_str().unwrap())),
        )
        .await;
        assert_eq!(status, StatusCode::GONE);
        assert_eq!(json["data"]["code"], "OUTSIDE_OPERATING_WINDOW");
    }
}
