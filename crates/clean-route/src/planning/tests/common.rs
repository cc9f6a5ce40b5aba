use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;
use tokio::sync::Semaphore;

use crate::planning::domain::{
    CandidateRoute, Coordinate, RouteCosts, RouteProfile, ScoredRoute, Segment, TransportMode,
    TravelContext, TripRequest, VulnerabilityProfile,
};
use crate::planning::pipeline::RoutePlanner;
use crate::planning::providers::{
    FixedTraffic, Geocoder, GeocodingError, RouteGeometry, RouteProvider, RouteStep,
    RoutingError,
};
use crate::planning::scoring::{
    answer_scoring_request, ScoringClient, ScoringOrchestrator, ScoringRequest,
    ScoringUnavailable, WireScoredRoute,
};

pub(super) const PUNE_STATION: Coordinate = Coordinate::new(18.5286, 73.8743);
pub(super) const SHIVAJINAGAR: Coordinate = Coordinate::new(18.5308, 73.8470);
pub(super) const KOTHRUD: Coordinate = Coordinate::new(18.5074, 73.8077);

pub(super) fn segment(density: f64, congestion: f64, length_km: f64, duration_secs: f64) -> Segment {
    Segment {
        id: format!("seg-{density}-{length_km}"),
        name: "FC Road".to_string(),
        road_class: "Main Road".to_string(),
        density,
        congestion,
        weight: 1.0,
        length_km,
        duration_secs,
        coordinates: vec![PUNE_STATION, SHIVAJINAGAR],
    }
}

pub(super) fn candidate(
    profile: RouteProfile,
    total_distance_m: f64,
    total_duration_secs: f64,
    segments: Vec<Segment>,
) -> CandidateRoute {
    CandidateRoute {
        profile,
        segments,
        total_distance_m,
        total_duration_secs,
        pollution_score: None,
    }
}

/// Scored route with hand-picked costs; segments are a single reference segment.
pub(super) fn scored(
    profile: RouteProfile,
    total_distance_m: f64,
    pollution: f64,
    time: f64,
) -> ScoredRoute {
    ScoredRoute {
        candidate: candidate(
            profile,
            total_distance_m,
            time,
            vec![segment(50.0, 1.5, total_distance_m / 1000.0, time)],
        ),
        costs: RouteCosts::weighted(pollution, time),
    }
}

pub(super) fn context(
    transport_mode: TransportMode,
    is_peak: bool,
    vulnerability: VulnerabilityProfile,
) -> TravelContext {
    TravelContext {
        transport_mode,
        is_peak,
        vulnerability,
    }
}

pub(super) fn trip(origin: &str, destination: &str) -> TripRequest {
    TripRequest {
        origin: origin.to_string(),
        destination: destination.to_string(),
        context: TravelContext::default(),
    }
}

pub(super) fn geometry(distance_m: f64, duration_secs: f64, steps: usize) -> RouteGeometry {
    let step_distance = distance_m / steps as f64;
    let step_duration = duration_secs / steps as f64;
    RouteGeometry {
        distance_m,
        duration_secs,
        steps: (0..steps)
            .map(|index| RouteStep {
                name: format!("Step {index}"),
                distance_m: step_distance,
                duration_secs: step_duration,
                coordinates: vec![PUNE_STATION, SHIVAJINAGAR],
            })
            .collect(),
    }
}

/// Geocoder answering from a fixed gazetteer; unknown places are not found.
#[derive(Debug, Default)]
pub(super) struct StaticGeocoder {
    places: HashMap<String, Coordinate>,
}

impl StaticGeocoder {
    pub(super) fn pune() -> Self {
        let places = [
            ("Pune Station", PUNE_STATION),
            ("Shivajinagar", SHIVAJINAGAR),
            ("Kothrud", KOTHRUD),
        ]
        .into_iter()
        .map(|(name, coordinate)| (name.to_string(), coordinate))
        .collect();
        Self { places }
    }
}

impl Geocoder for StaticGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinate>, GeocodingError> {
        Ok(self.places.get(query).copied())
    }
}

/// Route provider serving canned geometries per profile, optionally after a delay or
/// once a gate permit is available.
#[derive(Debug, Default)]
pub(super) struct FixtureRouter {
    responses: HashMap<RouteProfile, Result<Vec<RouteGeometry>, RoutingError>>,
    delay: Option<Duration>,
    gate: Option<Arc<Semaphore>>,
    calls: Mutex<Vec<RouteProfile>>,
    completed: AtomicUsize,
}

impl FixtureRouter {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn with_routes(mut self, profile: RouteProfile, routes: Vec<RouteGeometry>) -> Self {
        self.responses.insert(profile, Ok(routes));
        self
    }

    pub(super) fn with_failure(mut self, profile: RouteProfile, error: RoutingError) -> Self {
        self.responses.insert(profile, Err(error));
        self
    }

    pub(super) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every fetch consumes one permit of `gate` before answering.
    pub(super) fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Driving and bicycle alternatives that exercise every selection rule.
    pub(super) fn standard() -> Self {
        Self::new()
            .with_routes(
                RouteProfile::Driving,
                vec![geometry(4_200.0, 540.0, 3), geometry(5_100.0, 620.0, 4)],
            )
            .with_routes(RouteProfile::Bicycle, vec![geometry(3_900.0, 1_080.0, 3)])
            .with_routes(RouteProfile::Foot, vec![geometry(3_700.0, 2_700.0, 2)])
    }

    pub(super) fn calls(&self) -> Vec<RouteProfile> {
        self.calls
            .lock()
            .expect("calls lock")
            .clone()
    }

    pub(super) fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

impl RouteProvider for FixtureRouter {
    async fn routes(
        &self,
        _origin: Coordinate,
        _destination: Coordinate,
        profile: RouteProfile,
    ) -> Result<Vec<RouteGeometry>, RoutingError> {
        self.calls.lock().expect("calls lock").push(profile);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate open").forget();
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        self.responses
            .get(&profile)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[derive(Debug, Clone)]
pub(super) enum ScoringBehavior {
    /// Answer with the local formulas, as a well-behaved remote scorer would.
    Local,
    /// Answer with fixed annotations regardless of the request.
    Fixed(Vec<WireScoredRoute>),
    /// Answer with the local formulas plus a pollution score on every route.
    WithPollutionScore(f64),
    Fail(ScoringUnavailable),
    Hang,
}

#[derive(Debug)]
pub(super) struct FakeScoring {
    behavior: ScoringBehavior,
    requests: Mutex<Vec<ScoringRequest>>,
}

impl FakeScoring {
    pub(super) fn new(behavior: ScoringBehavior) -> Self {
        Self {
            behavior,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn requests(&self) -> Vec<ScoringRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl ScoringClient for FakeScoring {
    async fn score(
        &self,
        request: &ScoringRequest,
    ) -> Result<Vec<WireScoredRoute>, ScoringUnavailable> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());

        match &self.behavior {
            ScoringBehavior::Local => Ok(answer_scoring_request(request.clone())),
            ScoringBehavior::Fixed(routes) => Ok(routes.clone()),
            ScoringBehavior::WithPollutionScore(score) => {
                let mut routes = answer_scoring_request(request.clone());
                for route in &mut routes {
                    route.route.pollution_score = Some(*score);
                }
                Ok(routes)
            }
            ScoringBehavior::Fail(cause) => Err(cause.clone()),
            ScoringBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3_600)).await;
                Err(ScoringUnavailable::Transport("never answered".to_string()))
            }
        }
    }
}

pub(super) type TestPlanner = RoutePlanner<StaticGeocoder, FixtureRouter, FakeScoring, FixedTraffic>;

pub(super) fn orchestrator(behavior: ScoringBehavior) -> ScoringOrchestrator<FakeScoring> {
    ScoringOrchestrator::new(
        Arc::new(FakeScoring::new(behavior)),
        Duration::from_millis(250),
    )
}

pub(super) fn planner(router: FixtureRouter, behavior: ScoringBehavior) -> TestPlanner {
    planner_with(Arc::new(router), Arc::new(FakeScoring::new(behavior)))
}

pub(super) fn planner_with(router: Arc<FixtureRouter>, scoring: Arc<FakeScoring>) -> TestPlanner {
    RoutePlanner::new(
        Arc::new(StaticGeocoder::pune()),
        router,
        ScoringOrchestrator::new(scoring, Duration::from_millis(250)),
        Arc::new(FixedTraffic::new(50.0, 1.5)),
    )
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn approx_eq(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}
