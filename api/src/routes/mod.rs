//! HTTP route entry point for `/api/...`.
//!
//! - `/health` → liveness plus the selected store backend
//! - `/attendance` → session lifecycle, check-in and record projections
//! - `/registry` → read-only subjects and departments
//! - `/insights` → best-effort AI insights

use crate::routes::{
    attendance::attendance_routes, health::health_routes, insights::insights_routes,
    registry::registry_routes,
};
use crate::state::AppState;
use axum::Router;

pub mod attendance;
pub mod health;
pub mod insights;
pub mod registry;

/// Builds the `/api` router. The caller supplies the state with
/// `Router::with_state`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest("/attendance", attendance_routes())
        .nest("/registry", registry_routes())
        .nest("/insights", insights_routes())
}
