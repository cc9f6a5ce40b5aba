use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{FinalRoute, TransportMode, TravelContext, TripRequest, VulnerabilityProfile};
use super::pipeline::{PlanningError, RoutePlanner};
use super::providers::{Geocoder, RouteProvider, TrafficModel};
use super::recompute::recompute_metrics;
use super::scoring::{answer_scoring_request, ScoringClient, ScoringRequest};
use super::views::{comparison, FinalRouteView, RoutePlanView, StrategyComparisonEntry};

/// Body of a recompute call: the routes currently shown plus the new context.
///
/// Mode and peak hours must be restated as planned; only the vulnerability profile
/// may default.
#[derive(Debug, Clone, Deserialize)]
pub struct RecomputeRequest {
    pub routes: Vec<FinalRoute>,
    #[serde(default)]
    pub vulnerability: VulnerabilityProfile,
    pub transport_mode: TransportMode,
    pub is_peak: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecomputeResponse {
    pub routes: Vec<FinalRoute>,
    pub views: Vec<FinalRouteView>,
    pub comparison: Vec<StrategyComparisonEntry>,
}

/// Router builder exposing the planning, recompute and scoring endpoints.
pub fn planning_router<G, R, S, T>(planner: Arc<RoutePlanner<G, R, S, T>>) -> Router
where
    G: Geocoder + 'static,
    R: RouteProvider + 'static,
    S: ScoringClient + 'static,
    T: TrafficModel + 'static,
{
    Router::new()
        .route("/api/v1/routes/plan", post(plan_handler::<G, R, S, T>))
        .route("/api/v1/routes/recompute", post(recompute_handler))
        .route("/api/score-routes", post(score_routes_handler))
        .with_state(planner)
}

pub(crate) async fn plan_handler<G, R, S, T>(
    State(planner): State<Arc<RoutePlanner<G, R, S, T>>>,
    axum::Json(request): axum::Json<TripRequest>,
) -> Response
where
    G: Geocoder + 'static,
    R: RouteProvider + 'static,
    S: ScoringClient + 'static,
    T: TrafficModel + 'static,
{
    match planner.plan(&request).await {
        Ok(plan) => {
            let view = RoutePlanView::from_plan(&plan);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => planning_error_response(&error),
    }
}

pub(crate) async fn recompute_handler(
    axum::Json(request): axum::Json<RecomputeRequest>,
) -> Response {
    let context = TravelContext {
        transport_mode: request.transport_mode,
        is_peak: request.is_peak,
        vulnerability: request.vulnerability,
    };
    let routes = recompute_metrics(&request.routes, &context);
    let payload = RecomputeResponse {
        views: routes.iter().map(FinalRouteView::from).collect(),
        comparison: comparison(&routes),
        routes,
    };
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn score_routes_handler(
    axum::Json(request): axum::Json<ScoringRequest>,
) -> Response {
    let scored = answer_scoring_request(request);
    (StatusCode::OK, axum::Json(scored)).into_response()
}

pub(crate) fn planning_error_response(error: &PlanningError) -> Response {
    let code = match error {
        PlanningError::LocationNotFound { .. } => "location_not_found",
        PlanningError::NoRoutesFound { .. } => "no_routes_found",
    };
    let payload = json!({
        "error": error.to_string(),
        "code": code,
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}
