use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    response::{ApiResponse, rejection},
    state::AppState,
};

/// PUT /api/attendance/sessions/{session_id}/close
///
/// Idempotent: closing an inactive or unknown session still answers 200.
pub async fn close_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    match state.issuer().close_session(&session_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Attendance session closed")),
        )
            .into_response(),
        Err(e) => rejection(e),
    }
}
