use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{CandidateRoute, Coordinate, FinalRoute, TravelContext, TripRequest};
use super::providers::{synthesize_candidate, Geocoder, RouteProvider, TrafficModel};
use super::scoring::{ScoringClient, ScoringOrchestrator, ScoringSource};
use super::selection::select_diverse_routes;

/// Which trip endpoint a lookup concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Origin,
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Origin => write!(f, "origin"),
            Endpoint::Destination => write!(f, "destination"),
        }
    }
}

/// Conditions that abort a full planning run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanningError {
    #[error("could not find {endpoint} location: {location}")]
    LocationNotFound { endpoint: Endpoint, location: String },
    #[error("no routes found between {origin} and {destination}")]
    NoRoutesFound { origin: String, destination: String },
}

/// Output of one full planning run.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePlan {
    pub request: TripRequest,
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub candidate_count: usize,
    pub scoring_source: ScoringSource,
    pub routes: Vec<FinalRoute>,
    /// Index into `routes` of the route presented first.
    pub selected: usize,
    pub generated_at: DateTime<Utc>,
}

/// Geocode, fetch, score and select: the full pipeline behind a trip request.
pub struct RoutePlanner<G, R, S, T> {
    geocoder: Arc<G>,
    router: Arc<R>,
    scoring: ScoringOrchestrator<S>,
    traffic: Arc<T>,
}

impl<G, R, S, T> RoutePlanner<G, R, S, T>
where
    G: Geocoder + 'static,
    R: RouteProvider + 'static,
    S: ScoringClient + 'static,
    T: TrafficModel + 'static,
{
    pub fn new(
        geocoder: Arc<G>,
        router: Arc<R>,
        scoring: ScoringOrchestrator<S>,
        traffic: Arc<T>,
    ) -> Self {
        Self {
            geocoder,
            router,
            scoring,
            traffic,
        }
    }

    pub async fn plan(&self, request: &TripRequest) -> Result<RoutePlan, PlanningError> {
        let (origin, destination) = tokio::join!(
            self.resolve(Endpoint::Origin, &request.origin),
            self.resolve(Endpoint::Destination, &request.destination),
        );
        let origin = origin?;
        let destination = destination?;

        let pool = self
            .fetch_candidates(origin, destination, &request.context)
            .await;
        if pool.is_empty() {
            return Err(PlanningError::NoRoutesFound {
                origin: request.origin.clone(),
                destination: request.destination.clone(),
            });
        }

        let candidate_count = pool.len();
        let (routes, scoring_source) = self
            .score_and_select(pool, &request.context)
            .await
            .ok_or_else(|| PlanningError::NoRoutesFound {
                origin: request.origin.clone(),
                destination: request.destination.clone(),
            })?;

        info!(
            origin = %request.origin,
            destination = %request.destination,
            mode = request.context.transport_mode.label(),
            candidates = candidate_count,
            ?scoring_source,
            "route plan ready"
        );

        Ok(RoutePlan {
            request: request.clone(),
            origin,
            destination,
            candidate_count,
            scoring_source,
            routes,
            selected: 0,
            generated_at: Utc::now(),
        })
    }

    /// Score an assembled pool and pick the three presented routes.
    pub async fn score_and_select(
        &self,
        pool: Vec<CandidateRoute>,
        context: &TravelContext,
    ) -> Option<(Vec<FinalRoute>, ScoringSource)> {
        let outcome = self.scoring.score(pool, context).await;
        let source = outcome.source();
        let scored = outcome.into_routes();
        let selection = select_diverse_routes(&scored, context)?;
        Some((selection.into_routes(), source))
    }

    async fn resolve(&self, endpoint: Endpoint, query: &str) -> Result<Coordinate, PlanningError> {
        let not_found = || PlanningError::LocationNotFound {
            endpoint,
            location: query.to_string(),
        };

        match self.geocoder.geocode(query).await {
            Ok(Some(coordinate)) => Ok(coordinate),
            Ok(None) => Err(not_found()),
            Err(err) => {
                warn!(%endpoint, location = query, error = %err, "geocoding failed");
                Err(not_found())
            }
        }
    }

    /// Fetch every attempted profile concurrently; failed profiles are excluded.
    async fn fetch_candidates(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        context: &TravelContext,
    ) -> Vec<CandidateRoute> {
        let profiles = context.transport_mode.attempted_profiles();
        let fetches = profiles
            .iter()
            .map(|&profile| self.router.routes(origin, destination, profile));
        let results = join_all(fetches).await;

        let mut pool = Vec::new();
        for (profile_index, (profile, result)) in profiles.into_iter().zip(results).enumerate() {
            match result {
                Ok(geometries) => {
                    let before = pool.len();
                    pool.extend(geometries.into_iter().enumerate().filter_map(
                        |(route_index, geometry)| {
                            synthesize_candidate(
                                geometry,
                                profile,
                                profile_index,
                                route_index,
                                self.traffic.as_ref(),
                            )
                        },
                    ));
                    if pool.len() == before {
                        warn!(profile = profile.as_str(), "profile yielded no usable routes");
                    }
                }
                Err(err) => {
                    warn!(
                        profile = profile.as_str(),
                        error = %err,
                        "route fetch failed, excluding profile"
                    );
                }
            }
        }
        pool
    }
}
