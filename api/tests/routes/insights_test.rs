#[cfg(test)]
mod tests {
    use crate::helpers::{make_test_app, send};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn unconfigured_generator_returns_fallback() {
        let app = make_test_app();
        let stats = json!({ "sessions": 12, "students": [{ "id": "S101", "present": 3 }] });
        let (status, json) = send(&app, "POST", "/api/insights", Some(stats)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(
            json["data"]["summary"],
            "Unable to generate AI insights at this moment."
        );
        assert_eq!(json["data"]["atRiskStudents"], json!([]));
        assert_eq!(
            json["data"]["recommendations"],
            json!(["Ensure all students mark attendance via the verified protocol."])
        );
    }

    #[tokio::test]
    async fn participant_insights_include_summary() {
        let app = make_test_app();
        let (status, json) = send(&app, "GET", "/api/insights/participants/S404", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["summary"]["participant_id"], "S404");
        assert_eq!(json["data"]["summary"]["sessions_attended"], 0);
        assert!(json["data"]["report"]["summary"].is_string());
    }
}
