use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::common::{AttendanceRecordResponse, AttendanceSessionResponse};
use crate::{
    response::{ApiResponse, rejection},
    state::AppState,
};

/// GET /api/attendance/sessions/active
///
/// Polled by participants. `data` is `null` when no session is active.
pub async fn get_active_session(State(state): State<AppState>) -> Response {
    match state.issuer().active_session().await {
        Ok(Some(session)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Some(AttendanceSessionResponse::from(session)),
                "Active session retrieved",
            )),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::OK,
            Json(ApiResponse::<Option<AttendanceSessionResponse>>::success(
                None,
                "No active session",
            )),
        )
            .into_response(),
        Err(e) => rejection(e),
    }
}

/// GET /api/attendance/sessions/{session_id}/records
pub async fn list_session_records(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    match state.recorder().list_records(&session_id).await {
        Ok(rows) => {
            let rows: Vec<AttendanceRecordResponse> = rows.into_iter().map(Into::into).collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(rows, "Records retrieved")),
            )
                .into_response()
        }
        Err(e) => rejection(e),
    }
}

/// GET /api/attendance/participants/{participant_id}/history
///
/// Oldest first; clients reverse for display.
pub async fn list_participant_history(
    State(state): State<AppState>,
    Path(participant_id): Path<String>,
) -> Response {
    match state.recorder().list_history(&participant_id).await {
        Ok(rows) => {
            let rows: Vec<AttendanceRecordResponse> = rows.into_iter().map(Into::into).collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(rows, "History retrieved")),
            )
                .into_response()
        }
        Err(e) => rejection(e),
    }
}
