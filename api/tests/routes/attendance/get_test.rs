#[cfg(test)]
mod tests {
    use super::super::{mark_body, open_session};
    use crate::helpers::{make_test_app, send};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn active_session_is_null_when_none() {
        let app = make_test_app();
        let (status, json) = send(&app, "GET", "/api/attendance/sessions/active", None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["data"].is_null());
        assert_eq!(json["message"], "No active session");
    }

    #[tokio::test]
    async fn active_session_hides_the_otp() {
        let app = make_test_app();
        let session = open_session(&app, 15).await;
        let (status, json) = send(&app, "GET", "/api/attendance/sessions/active", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["id"], session["id"]);
        assert!(json["data"].get("otp").is_none());
        assert!(json["data"].get("qr_payload").is_none());
    }

    #[tokio::test]
    async fn records_and_history_list_committed_marks() {
        let app = make_test_app();
        let session = open_session(&app, 15).await;
        let id = session["id"].as_str().unwrap();
        let otp = session["otp"].as_str().unwrap();
        let mark_uri = format!("/api/attendance/sessions/{id}/mark");

        for participant in ["S101", "S102"] {
            let (status, _) = send(&app, "POST", &mark_uri, Some(mark_body(participant, otp))).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, json) = send(
            &app,
            "GET",
            &format!("/api/attendance/sessions/{id}/records"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 2);

        let (status, json) = send(
            &app,
            "GET",
            "/api/attendance/participants/S102/history",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let history = json["data"].as_array().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["session_id"], id);
    }

    #[tokio::test]
    async fn unknown_session_has_no_records() {
        let app = make_test_app();
        let (status, json) = send(&app, "GET", "/api/attendance/sessions/nope/records", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 0);
    }
}
