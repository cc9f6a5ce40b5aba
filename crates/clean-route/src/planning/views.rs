use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{
    Coordinate, FinalRoute, RouteCosts, RouteMetrics, RouteProfile, Segment, Strategy,
};
use super::formula::{road_pollution, ExposureRating, SeverityBand};
use super::pipeline::RoutePlan;
use super::scoring::ScoringSource;

#[derive(Debug, Clone, Serialize)]
pub struct MetricsView {
    pub total_exposure: f64,
    pub exposure_per_km: f64,
    pub distance_km: f64,
    pub risk_index: f64,
    pub duration_secs: u64,
    pub exposure_rating: ExposureRating,
    pub exposure_rating_label: &'static str,
    pub severity: SeverityBand,
    pub severity_color: &'static str,
}

impl From<&RouteMetrics> for MetricsView {
    fn from(metrics: &RouteMetrics) -> Self {
        let rating = ExposureRating::for_score(metrics.total_exposure);
        let severity = SeverityBand::for_score(metrics.total_exposure);
        Self {
            total_exposure: metrics.total_exposure,
            exposure_per_km: metrics.exposure_per_km,
            distance_km: metrics.distance_km,
            risk_index: metrics.risk_index,
            duration_secs: metrics.duration_secs,
            exposure_rating: rating,
            exposure_rating_label: rating.label(),
            severity,
            severity_color: severity.color(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentView {
    pub id: String,
    pub name: String,
    pub road_class: String,
    pub length_km: f64,
    pub duration_secs: f64,
    pub pollution: f64,
    pub severity: SeverityBand,
    pub color: &'static str,
    pub coordinates: Vec<Coordinate>,
}

impl From<&Segment> for SegmentView {
    fn from(segment: &Segment) -> Self {
        let pollution = road_pollution(segment.density, segment.congestion, segment.weight);
        let severity = SeverityBand::for_score(pollution);
        Self {
            id: segment.id.clone(),
            name: segment.name.clone(),
            road_class: segment.road_class.clone(),
            length_km: segment.length_km,
            duration_secs: segment.duration_secs,
            pollution,
            severity,
            color: severity.color(),
            coordinates: segment.coordinates.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FinalRouteView {
    pub id: usize,
    pub strategy: Strategy,
    pub strategy_label: &'static str,
    pub color: String,
    pub profile: RouteProfile,
    pub costs: RouteCosts,
    pub metrics: MetricsView,
}

impl From<&FinalRoute> for FinalRouteView {
    fn from(route: &FinalRoute) -> Self {
        Self {
            id: route.id,
            strategy: route.strategy,
            strategy_label: route.strategy.label(),
            color: route.color.clone(),
            profile: route.route.candidate.profile,
            costs: route.route.costs,
            metrics: MetricsView::from(&route.metrics),
        }
    }
}

/// Detail panel for the currently selected route.
#[derive(Debug, Clone, Serialize)]
pub struct SelectedRouteView {
    pub id: usize,
    pub strategy: Strategy,
    pub segments: Vec<SegmentView>,
    pub metrics: MetricsView,
}

/// One bar of the per-strategy exposure comparison.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyComparisonEntry {
    pub strategy: Strategy,
    pub strategy_label: &'static str,
    pub color: String,
    pub total_exposure: f64,
    pub risk_index: f64,
    pub distance_km: f64,
    pub duration_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoutePlanView {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub candidate_count: usize,
    pub scoring_source: ScoringSource,
    pub selected: usize,
    pub routes: Vec<FinalRouteView>,
    pub selected_route: Option<SelectedRouteView>,
    pub comparison: Vec<StrategyComparisonEntry>,
    pub generated_at: DateTime<Utc>,
}

impl RoutePlanView {
    pub fn from_plan(plan: &RoutePlan) -> Self {
        let selected_route = plan.routes.get(plan.selected).map(|route| SelectedRouteView {
            id: route.id,
            strategy: route.strategy,
            segments: route.segments().iter().map(SegmentView::from).collect(),
            metrics: MetricsView::from(&route.metrics),
        });

        Self {
            origin: plan.origin,
            destination: plan.destination,
            candidate_count: plan.candidate_count,
            scoring_source: plan.scoring_source,
            selected: plan.selected,
            routes: plan.routes.iter().map(FinalRouteView::from).collect(),
            selected_route,
            comparison: comparison(&plan.routes),
            generated_at: plan.generated_at,
        }
    }
}

pub fn comparison(routes: &[FinalRoute]) -> Vec<StrategyComparisonEntry> {
    routes
        .iter()
        .map(|route| StrategyComparisonEntry {
            strategy: route.strategy,
            strategy_label: route.strategy.label(),
            color: route.color.clone(),
            total_exposure: route.metrics.total_exposure,
            risk_index: route.metrics.risk_index,
            distance_km: route.metrics.distance_km,
            duration_secs: route.metrics.duration_secs,
        })
        .collect()
}
