use std::future::Future;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::traffic::TrafficModel;
use crate::planning::domain::{CandidateRoute, Coordinate, RouteProfile, Segment};
use crate::planning::formula::round_to;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RoutingError {
    #[error("routing transport failed: {0}")]
    Transport(String),
    #[error("routing service responded with status {0}")]
    Status(u16),
    #[error("malformed routing response: {0}")]
    Malformed(String),
}

/// One named step of a route as returned by the geometry collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStep {
    pub name: String,
    pub distance_m: f64,
    pub duration_secs: f64,
    pub coordinates: Vec<Coordinate>,
}

/// One alternative route between two coordinates for a profile.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    pub distance_m: f64,
    pub duration_secs: f64,
    pub steps: Vec<RouteStep>,
}

/// Produces alternative route geometries between two coordinates.
pub trait RouteProvider: Send + Sync {
    fn routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        profile: RouteProfile,
    ) -> impl Future<Output = Result<Vec<RouteGeometry>, RoutingError>> + Send;
}

/// Route provider speaking the OSRM `route/v1` HTTP API.
#[derive(Debug, Clone)]
pub struct OsrmRouteProvider {
    client: Client,
    base_url: String,
}

impl OsrmRouteProvider {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn route_url(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        profile: RouteProfile,
    ) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.base_url,
            profile.as_str(),
            origin.lon,
            origin.lat,
            destination.lon,
            destination.lat
        )
    }
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    #[serde(default)]
    name: String,
    distance: f64,
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    #[serde(default)]
    coordinates: Vec<[f64; 2]>,
}

impl From<OsrmRoute> for RouteGeometry {
    fn from(route: OsrmRoute) -> Self {
        let steps = route
            .legs
            .into_iter()
            .flat_map(|leg| leg.steps)
            .map(|step| RouteStep {
                name: step.name,
                distance_m: step.distance,
                duration_secs: step.duration,
                coordinates: step
                    .geometry
                    .coordinates
                    .into_iter()
                    .map(|[lon, lat]| Coordinate::new(lat, lon))
                    .collect(),
            })
            .collect();

        Self {
            distance_m: route.distance,
            duration_secs: route.duration,
            steps,
        }
    }
}

impl RouteProvider for OsrmRouteProvider {
    async fn routes(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        profile: RouteProfile,
    ) -> Result<Vec<RouteGeometry>, RoutingError> {
        let response = self
            .client
            .get(self.route_url(origin, destination, profile))
            .query(&[
                ("overview", "full"),
                ("geometries", "geojson"),
                ("alternatives", "true"),
                ("steps", "true"),
            ])
            .send()
            .await
            .map_err(|err| RoutingError::Transport(err.to_string()))?;

        // OSRM reports "no route" style outcomes as 4xx bodies carrying a code.
        let status = response.status();
        if status.is_server_error() {
            return Err(RoutingError::Status(status.as_u16()));
        }

        let body: OsrmResponse = response
            .json()
            .await
            .map_err(|err| RoutingError::Malformed(err.to_string()))?;

        if body.code != "Ok" {
            debug!(profile = profile.as_str(), code = %body.code, "routing returned no routes");
            return Ok(Vec::new());
        }

        Ok(body.routes.into_iter().map(RouteGeometry::from).collect())
    }
}

/// Turn a routing alternative into a candidate, synthesizing traffic per step.
///
/// Steps with fewer than two coordinates cannot form a segment and are skipped; a
/// geometry with no usable step yields `None`.
pub fn synthesize_candidate<T>(
    geometry: RouteGeometry,
    profile: RouteProfile,
    profile_index: usize,
    route_index: usize,
    traffic: &T,
) -> Option<CandidateRoute>
where
    T: TrafficModel + ?Sized,
{
    let segments: Vec<Segment> = geometry
        .steps
        .into_iter()
        .enumerate()
        .filter(|(_, step)| step.coordinates.len() >= 2)
        .map(|(step_index, step)| {
            let sample = traffic.sample(profile);
            let name = if step.name.trim().is_empty() {
                "Street".to_string()
            } else {
                step.name
            };

            Segment {
                id: format!("seg-{profile_index}-{route_index}-{step_index}"),
                name,
                road_class: profile.road_class().to_string(),
                density: sample.density,
                congestion: sample.congestion,
                weight: profile.segment_weight(),
                length_km: round_to(step.distance_m / 1000.0, 2),
                duration_secs: step.duration_secs.max(0.0),
                coordinates: step.coordinates,
            }
        })
        .collect();

    if segments.is_empty() {
        return None;
    }

    Some(CandidateRoute {
        profile,
        segments,
        total_distance_m: geometry.distance_m,
        total_duration_secs: geometry.duration_secs,
        pollution_score: None,
    })
}
