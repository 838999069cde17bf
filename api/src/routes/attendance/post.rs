use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use services::{MarkAttendance, OpenSession};

use super::common::{
    AttendanceRecordResponse, IssuedSessionResponse, MarkAttendanceReq, OpenSessionReq,
};
use crate::{
    response::{ApiResponse, rejection},
    state::AppState,
};

/// POST /api/attendance/sessions
///
/// Opens a session and retires whichever session was active before.
///
/// ### Responses
/// - `201 Created` with the session, its OTP and QR payload
/// - `400 Bad Request` on a non-positive duration
/// - `404 Not Found` on an unknown subject or department
/// - `409 Conflict` when another open won a concurrent race
/// - `503 Service Unavailable` when the store rejects the write
pub async fn open_session(
    State(state): State<AppState>,
    Json(body): Json<OpenSessionReq>,
) -> Response {
    let params = OpenSession {
        subject_id: body.subject_id,
        department: body.department,
        faculty_id: body.faculty_id,
        duration_minutes: body.duration_minutes,
    };

    match state.issuer().open_session(params).await {
        Ok(session) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                IssuedSessionResponse::from(session),
                "Attendance session opened",
            )),
        )
            .into_response(),
        Err(e) => rejection(e),
    }
}

/// POST /api/attendance/sessions/{session_id}/mark
///
/// Participant check-in. The clock is read here, per attempt.
///
/// ### Responses
/// - `201 Created` with the committed record
/// - `400 Bad Request` for out-of-bounds location, QR mismatch, wrong OTP or
///   an invalid coordinate (`retryable: true`)
/// - `409 Conflict` when this participant is already marked
/// - `410 Gone` when the session is not the active one, its window has
///   passed, or check-in is outside operating hours
pub async fn mark_attendance(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<MarkAttendanceReq>,
) -> Response {
    let params = MarkAttendance {
        session_id,
        participant_id: body.participant_id,
        participant_name: body.participant_name,
        submitted_otp: body.otp,
        qr_match: body.qr_match,
        geo_verified: body.geo_verified,
        position: body.position,
        scanned_payload: body.scanned_payload,
    };

    match state.recorder().mark_present(params, Utc::now()).await {
        Ok(record) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                AttendanceRecordResponse::from(record),
                "Attendance recorded",
            )),
        )
            .into_response(),
        Err(e) => rejection(e),
    }
}
