use crate::{
    response::{ApiResponse, rejection},
    state::AppState,
};
use ai::{InsightReport, generate_or_fallback};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use services::attendance_record::ParticipantSummary;

pub fn insights_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(generate_insights))
        .route("/participants/{participant_id}", get(participant_insights))
}

/// POST /api/insights
///
/// Accepts any JSON aggregate. Always answers 200; when the generator is
/// unavailable the fallback report is returned.
pub async fn generate_insights(
    State(state): State<AppState>,
    Json(stats): Json<serde_json::Value>,
) -> (StatusCode, Json<ApiResponse<InsightReport>>) {
    let report = generate_or_fallback(state.insights(), &stats).await;
    (
        StatusCode::OK,
        Json(ApiResponse::success(report, "Insights generated")),
    )
}

#[derive(Debug, Serialize)]
pub struct ParticipantInsights {
    pub summary: ParticipantSummary,
    pub report: InsightReport,
}

/// GET /api/insights/participants/{participant_id}
pub async fn participant_insights(
    State(state): State<AppState>,
    Path(participant_id): Path<String>,
) -> Response {
    let summary = match state.recorder().participant_summary(&participant_id).await {
        Ok(summary) => summary,
        Err(e) => return rejection(e),
    };

    let stats = serde_json::to_value(&summary).unwrap_or_default();
    let report = generate_or_fallback(state.insights(), &stats).await;

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            ParticipantInsights { summary, report },
            "Participant insights generated",
        )),
    )
        .into_response()
}
