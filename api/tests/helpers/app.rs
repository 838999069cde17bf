use ai::GeminiInsights;
use api::{routes::routes, state::AppState};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use services::gateway::LocalGateway;
use services::geofence::CampusLocation;
use services::operating_window::OperatingWindow;
use std::sync::Arc;
use tower::ServiceExt;

pub const CAMPUS: CampusLocation = CampusLocation {
    latitude: 11.0827,
    longitude: 77.0003,
    radius_meters: 800.0,
};

/// App over a fresh in-memory store, open around the clock, with no AI key.
pub fn make_test_app() -> Router {
    make_test_app_with(OperatingWindow::ALWAYS)
}

pub fn make_test_app_with(window: OperatingWindow) -> Router {
    let state = AppState::new(
        Arc::new(LocalGateway::in_memory()),
        CAMPUS,
        window,
        Arc::new(GeminiInsights::new("", "gemini-2.5-flash")),
    );
    Router::new().nest("/api", routes()).with_state(state)
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    (status, json_body(response).await)
}

pub async fn json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}
