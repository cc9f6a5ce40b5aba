use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;

use crate::planning::domain::{FinalRoute, RouteProfile, TransportMode};
use crate::planning::router::{plan_handler, planning_router};
use crate::planning::scoring::ScoringRequest;

fn post_json(uri: &str, body: &Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(body).expect("serialize body"),
        ))
        .expect("request builds")
}

#[tokio::test]
async fn plan_route_returns_three_routes_and_selected_details() {
    let router = planning_router(Arc::new(planner(
        FixtureRouter::standard(),
        ScoringBehavior::Local,
    )));

    let response = router
        .oneshot(post_json(
            "/api/v1/routes/plan",
            &json!({
                "origin": "Pune Station",
                "destination": "Kothrud",
                "transport_mode": "CAR",
                "is_peak": true,
                "vulnerability": "CHILD",
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["routes"].as_array().map(Vec::len), Some(3));
    assert_eq!(payload["selected"], json!(0));
    assert_eq!(payload["routes"][0]["strategy"], json!("Fastest"));
    assert_eq!(payload["routes"][1]["color"], json!("#39ff14"));
    assert_eq!(payload["selected_route"]["id"], json!(0));
    assert_eq!(
        payload["selected_route"]["segments"].as_array().map(Vec::len),
        Some(3)
    );
    assert!(payload["selected_route"]["metrics"]["exposure_rating"].is_string());
    assert_eq!(payload["comparison"].as_array().map(Vec::len), Some(3));
    assert_eq!(payload["scoring_source"], json!("remote"));
}

#[tokio::test]
async fn plan_handler_maps_unknown_location_to_not_found() {
    let planner = Arc::new(planner(FixtureRouter::standard(), ScoringBehavior::Local));

    let response = plan_handler(State(planner), axum::Json(trip("Atlantis", "Kothrud"))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["code"], json!("location_not_found"));
    assert_eq!(
        payload["error"],
        json!("could not find origin location: Atlantis")
    );
}

#[tokio::test]
async fn plan_handler_maps_missing_routes_to_distinct_code() {
    let planner = Arc::new(planner(FixtureRouter::new(), ScoringBehavior::Local));

    let response = plan_handler(
        State(planner),
        axum::Json(trip("Pune Station", "Kothrud")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["code"], json!("no_routes_found"));
}

#[tokio::test]
async fn recompute_route_updates_exposure_only() {
    let planner = Arc::new(planner(FixtureRouter::standard(), ScoringBehavior::Local));
    let plan = planner
        .plan(&trip("Pune Station", "Kothrud"))
        .await
        .expect("plan succeeds");
    let router = planning_router(planner);

    let response = router
        .oneshot(post_json(
            "/api/v1/routes/recompute",
            &json!({
                "routes": plan.routes,
                "vulnerability": "ASTHMATIC",
                "transport_mode": "CAR",
                "is_peak": false,
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let routes: Vec<FinalRoute> =
        serde_json::from_value(payload["routes"].clone()).expect("routes decode");
    assert_eq!(routes.len(), plan.routes.len());
    for (before, after) in plan.routes.iter().zip(&routes) {
        assert_eq!(before.strategy, after.strategy);
        assert_eq!(before.metrics.distance_km, after.metrics.distance_km);
        assert_eq!(before.metrics.duration_secs, after.metrics.duration_secs);
        assert!(after.metrics.total_exposure > before.metrics.total_exposure);
    }
    assert_eq!(payload["comparison"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn recompute_requires_the_planned_mode_and_peak_flag() {
    let planner = Arc::new(planner(FixtureRouter::standard(), ScoringBehavior::Local));
    let mut request = trip("Pune Station", "Kothrud");
    request.context.transport_mode = TransportMode::Bike;
    let plan = planner.plan(&request).await.expect("plan succeeds");
    let router = planning_router(planner);

    let missing_mode = router
        .clone()
        .oneshot(post_json(
            "/api/v1/routes/recompute",
            &json!({ "routes": plan.routes, "vulnerability": "NORMAL" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(missing_mode.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let restated = router
        .oneshot(post_json(
            "/api/v1/routes/recompute",
            &json!({
                "routes": plan.routes,
                "vulnerability": "NORMAL",
                "transport_mode": "BIKE",
                "is_peak": false,
            }),
        ))
        .await
        .expect("route executes");
    assert_eq!(restated.status(), StatusCode::OK);
    let payload = read_json_body(restated).await;
    let routes: Vec<FinalRoute> =
        serde_json::from_value(payload["routes"].clone()).expect("routes decode");
    for (before, after) in plan.routes.iter().zip(&routes) {
        assert_eq!(before.metrics, after.metrics);
    }
}

#[tokio::test]
async fn score_routes_speaks_the_scorer_wire_protocol() {
    let pool = vec![candidate(
        RouteProfile::Driving,
        2_000.0,
        600.0,
        vec![segment(50.0, 1.5, 2.0, 600.0)],
    )];
    let request = ScoringRequest::from_pool(&pool, TransportMode::Car, false);
    let router = planning_router(Arc::new(planner(
        FixtureRouter::new(),
        ScoringBehavior::Local,
    )));

    let response = router
        .oneshot(post_json(
            "/api/score-routes",
            &serde_json::to_value(&request).expect("request serializes"),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload[0]["costPollution"], json!(150.0));
    assert_eq!(payload[0]["costTime"], json!(600.0));
    assert_eq!(payload[0]["costCombined"], json!(150.0));
    assert_eq!(payload[0]["roads"][0]["type"], json!("Main Road"));
}
