use serde::{Deserialize, Serialize};

use crate::planning::domain::{
    CandidateRoute, Coordinate, RouteCosts, RouteProfile, Segment, TransportMode,
};

/// Batch request sent to the scoring collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRequest {
    pub routes: Vec<WireRoute>,
    pub transport_mode: TransportMode,
    pub is_peak: bool,
}

impl ScoringRequest {
    pub fn from_pool(
        pool: &[CandidateRoute],
        transport_mode: TransportMode,
        is_peak: bool,
    ) -> Self {
        Self {
            routes: pool.iter().map(WireRoute::from).collect(),
            transport_mode,
            is_peak,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRoute {
    pub profile: RouteProfile,
    pub roads: Vec<WireSegment>,
    pub total_distance: f64,
    pub total_duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pollution_score: Option<f64>,
}

/// Segment as exchanged with the scorer; coordinates are `[lat, lon]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireSegment {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub road_class: String,
    pub density: f64,
    pub congestion: f64,
    pub weight: f64,
    pub length: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub coordinates: Vec<[f64; 2]>,
}

/// A route annotated by the scorer. Everything but the cost fields is echoed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireScoredRoute {
    #[serde(flatten)]
    pub route: WireRoute,
    pub cost_pollution: f64,
    pub cost_time: f64,
    pub cost_combined: f64,
}

impl WireScoredRoute {
    pub fn new(route: WireRoute, costs: RouteCosts) -> Self {
        Self {
            route,
            cost_pollution: costs.pollution,
            cost_time: costs.time,
            cost_combined: costs.combined,
        }
    }

    pub fn costs(&self) -> RouteCosts {
        RouteCosts {
            pollution: self.cost_pollution,
            time: self.cost_time,
            combined: self.cost_combined,
        }
    }
}

impl From<&CandidateRoute> for WireRoute {
    fn from(candidate: &CandidateRoute) -> Self {
        Self {
            profile: candidate.profile,
            roads: candidate.segments.iter().map(WireSegment::from).collect(),
            total_distance: candidate.total_distance_m,
            total_duration: candidate.total_duration_secs,
            pollution_score: candidate.pollution_score,
        }
    }
}

impl From<WireRoute> for CandidateRoute {
    fn from(route: WireRoute) -> Self {
        Self {
            profile: route.profile,
            segments: route.roads.into_iter().map(Segment::from).collect(),
            total_distance_m: route.total_distance,
            total_duration_secs: route.total_duration,
            pollution_score: route.pollution_score,
        }
    }
}

impl From<&Segment> for WireSegment {
    fn from(segment: &Segment) -> Self {
        Self {
            id: segment.id.clone(),
            name: segment.name.clone(),
            road_class: segment.road_class.clone(),
            density: segment.density,
            congestion: segment.congestion,
            weight: segment.weight,
            length: segment.length_km,
            duration: segment.duration_secs,
            coordinates: segment
                .coordinates
                .iter()
                .map(|point| [point.lat, point.lon])
                .collect(),
        }
    }
}

impl From<WireSegment> for Segment {
    fn from(segment: WireSegment) -> Self {
        Self {
            id: segment.id,
            name: segment.name,
            road_class: segment.road_class,
            density: segment.density,
            congestion: segment.congestion,
            weight: segment.weight,
            length_km: segment.length,
            duration_secs: segment.duration,
            coordinates: segment
                .coordinates
                .into_iter()
                .map(|[lat, lon]| Coordinate::new(lat, lon))
                .collect(),
        }
    }
}
