use crate::{response::ApiResponse, state::AppState};
use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde::Serialize;
use services::Backend;

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: Backend,
}

/// GET /api/health
///
/// ```json
/// {
///   "success": true,
///   "data": { "status": "OK", "backend": "local" },
///   "message": "Health check passed"
/// }
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(
        HealthResponse {
            status: "OK",
            backend: state.gateway().backend(),
        },
        "Health check passed",
    ))
}
