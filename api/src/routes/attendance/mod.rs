use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

mod common;
mod get;
mod post;
mod put;

pub use common::{
    AttendanceRecordResponse, AttendanceSessionResponse, IssuedSessionResponse, MarkAttendanceReq,
    OpenSessionReq,
};
pub use get::{get_active_session, list_participant_history, list_session_records};
pub use post::{mark_attendance, open_session};
pub use put::close_session;

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(open_session))
        .route("/sessions/active", get(get_active_session))
        .route("/sessions/{session_id}/close", put(close_session))
        .route("/sessions/{session_id}/mark", post(mark_attendance))
        .route("/sessions/{session_id}/records", get(list_session_records))
        .route(
            "/participants/{participant_id}/history",
            get(list_participant_history),
        )
}
