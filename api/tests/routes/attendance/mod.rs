mod get_test;
mod post_test;
mod put_test;

use crate::helpers::send;
use axum::Router;
use axum::http::StatusCode;
use serde_json::{Value, json};

/// Opens a CS801 session through the API and returns its `data`.
pub async fn open_session(app: &Router, duration_minutes: i64) -> Value {
    let (status, json) = send(
        app,
        "POST",
        "/api/attendance/sessions",
        Some(json!({
            "subject_id": "CS801",
            "department": "Computer Science",
            "faculty_id": "F001",
            "duration_minutes": duration_minutes
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json["data"].clone()
}

pub fn mark_body(participant_id: &str, otp: &str) -> Value {
    json!({
        "participant_id": participant_id,
        "participant_name": "Arun Kumar",
        "otp": otp,
        "qr_match": true,
        "geo_verified": true
    })
}
