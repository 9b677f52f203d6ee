use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::handlers;
use crate::state::AppState;

/// Assembles the full HTTP surface: the report-ingress routes, the
/// mini-app form, the admin pass-throughs and the read-only query routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/report-inspector", post(handlers::report_inspector))
        .route("/mini-app", get(handlers::mini_app))
        .route("/mini-app/report", post(handlers::mini_app_report))
        .route("/send-mini-app", post(handlers::send_mini_app))
        .route("/restart", post(handlers::restart))
        .route("/segment-colors", get(handlers::segment_colors))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
