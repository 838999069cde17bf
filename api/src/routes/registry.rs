use crate::{
    response::{ApiResponse, rejection},
    state::AppState,
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use services::AttendanceError;

pub fn registry_routes() -> Router<AppState> {
    Router::new()
        .route("/subjects", get(list_subjects))
        .route("/departments", get(list_departments))
}

/// GET /api/registry/subjects
pub async fn list_subjects(State(state): State<AppState>) -> Response {
    match state.gateway().list_subjects().await {
        Ok(subjects) => (
            StatusCode::OK,
            Json(ApiResponse::success(subjects, "Subjects retrieved")),
        )
            .into_response(),
        Err(e) => rejection(AttendanceError::from(e)),
    }
}

/// GET /api/registry/departments
///
/// Returns department names only.
pub async fn list_departments(State(state): State<AppState>) -> Response {
    match state.gateway().list_departments().await {
        Ok(departments) => {
            let names: Vec<String> = departments.into_iter().map(|d| d.name).collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(names, "Departments retrieved")),
            )
                .into_response()
        }
        Err(e) => rejection(AttendanceError::from(e)),
    }
}
