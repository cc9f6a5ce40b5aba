use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use clean_route::planning::providers::{Geocoder, RouteProvider, TrafficModel};
use clean_route::planning::{planning_router, RoutePlanner, ScoringClient};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_planning_routes<G, R, S, T>(
    planner: Arc<RoutePlanner<G, R, S, T>>,
) -> axum::Router
where
    G: Geocoder + 'static,
    R: RouteProvider + 'static,
    S: ScoringClient + 'static,
    T: TrafficModel + 'static,
{
    planning_router(planner)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
