use super::domain::{RouteMetrics, Segment, TravelContext};
use super::formula::{adjusted_pollution, health_exposure, risk_index, road_pollution, round_to};

/// Per-segment weight used during aggregation. Mode weighting happens once at the
/// route level through [`super::domain::TransportMode::exposure_multiplier`].
const AGGREGATION_SEGMENT_WEIGHT: f64 = 1.0;

/// Aggregate ordered segments into route-level metrics for a traveler.
pub fn aggregate(segments: &[Segment], context: &TravelContext) -> RouteMetrics {
    let vulnerability = context.vulnerability.multiplier();
    let mode_multiplier = context.transport_mode.exposure_multiplier();

    let mut total_exposure = 0.0;
    let mut total_distance = 0.0;
    let mut total_duration = 0.0;

    for segment in segments {
        let base = road_pollution(
            segment.density,
            segment.congestion,
            AGGREGATION_SEGMENT_WEIGHT,
        );
        let personal = health_exposure(base, vulnerability);
        let adjusted = adjusted_pollution(personal, context.is_peak);

        total_exposure += adjusted * segment.length_km * mode_multiplier;
        total_distance += segment.length_km;
        total_duration += segment.duration_secs;
    }

    let per_km_denominator = if total_distance == 0.0 {
        1.0
    } else {
        total_distance
    };

    RouteMetrics {
        total_exposure: round_to(total_exposure, 2),
        exposure_per_km: round_to(total_exposure / per_km_denominator, 2),
        distance_km: round_to(total_distance, 2),
        risk_index: risk_index(total_exposure),
        duration_secs: total_duration.max(0.0).round() as u64,
    }
}

/// Metrics shown for a route: local aggregation with a remotely computed pollution
/// score taking precedence for the displayed exposure and the derived risk index.
pub fn display_metrics(
    segments: &[Segment],
    context: &TravelContext,
    remote_score: Option<f64>,
) -> RouteMetrics {
    let mut metrics = aggregate(segments, context);
    if let Some(score) = remote_score {
        metrics.total_exposure = score;
        metrics.risk_index = risk_index(score);
    }
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::domain::{Coordinate, TransportMode, VulnerabilityProfile};

    fn aggregate_for_mode(
        segments: &[Segment],
        transport_mode: TransportMode,
        is_peak: bool,
    ) -> RouteMetrics {
        let context = TravelContext {
            transport_mode,
            is_peak,
            ..TravelContext::default()
        };
        aggregate(segments, &context)
    }

    fn segment(density: f64, congestion: f64, length_km: f64, duration_secs: f64) -> Segment {
        Segment {
            id: "seg-0-0-0".to_string(),
            name: "Marine Drive".to_string(),
            road_class: "Main Road".to_string(),
            density,
            congestion,
            weight: 1.0,
            length_km,
            duration_secs,
            coordinates: vec![Coordinate::new(19.076, 72.8777), Coordinate::new(19.08, 72.88)],
        }
    }

    #[test]
    fn normal_off_peak_car_scenario() {
        let segments = vec![segment(50.0, 1.5, 2.0, 240.0)];
        let metrics = aggregate(&segments, &TravelContext::default());

        assert!((metrics.total_exposure - 150.0).abs() < 1e-9);
        assert!((metrics.exposure_per_km - 75.0).abs() < 1e-9);
        assert!((metrics.distance_km - 2.0).abs() < 1e-9);
        assert_eq!(metrics.risk_index, 3.8);
        assert_eq!(metrics.duration_secs, 240);
    }

    #[test]
    fn asthmatic_peak_scenario() {
        let segments = vec![segment(50.0, 1.5, 2.0, 240.0)];
        let context = TravelContext {
            transport_mode: TransportMode::Car,
            is_peak: true,
            vulnerability: VulnerabilityProfile::Asthmatic,
        };
        let metrics = aggregate(&segments, &context);

        assert!((metrics.total_exposure - 351.0).abs() < 1e-9);
        assert_eq!(metrics.risk_index, 8.8);
    }

    #[test]
    fn slower_modes_accumulate_more_exposure() {
        let segments = vec![segment(40.0, 1.2, 1.5, 100.0), segment(20.0, 1.0, 0.5, 50.0)];
        let car = aggregate_for_mode(&segments, TransportMode::Car, false);
        let bike = aggregate_for_mode(&segments, TransportMode::Bike, false);
        let walk = aggregate_for_mode(&segments, TransportMode::Walk, false);

        assert!(car.total_exposure < bike.total_exposure);
        assert!(bike.total_exposure < walk.total_exposure);
        assert_eq!(car.distance_km, walk.distance_km);
        assert_eq!(car.duration_secs, 150);
    }

    #[test]
    fn empty_routes_do_not_divide_by_zero() {
        let metrics = aggregate(&[], &TravelContext::default());
        assert_eq!(metrics.total_exposure, 0.0);
        assert_eq!(metrics.exposure_per_km, 0.0);
        assert_eq!(metrics.risk_index, 0.0);
        assert_eq!(metrics.duration_secs, 0);
    }

    #[test]
    fn zero_length_segments_use_unit_denominator() {
        let segments = vec![segment(80.0, 2.0, 0.0, 30.0)];
        let metrics = aggregate(&segments, &TravelContext::default());
        assert_eq!(metrics.distance_km, 0.0);
        assert_eq!(metrics.exposure_per_km, metrics.total_exposure);
    }

    #[test]
    fn remote_score_overrides_displayed_exposure() {
        let segments = vec![segment(50.0, 1.5, 2.0, 240.0)];
        let metrics = display_metrics(&segments, &TravelContext::default(), Some(420.0));

        assert_eq!(metrics.total_exposure, 420.0);
        assert_eq!(metrics.risk_index, 10.0);
        assert!((metrics.distance_km - 2.0).abs() < 1e-9);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let segments = vec![segment(33.0, 1.7, 0.73, 61.0), segment(71.0, 2.4, 1.18, 95.5)];
        let context = TravelContext {
            transport_mode: TransportMode::Walk,
            is_peak: true,
            vulnerability: VulnerabilityProfile::Elderly,
        };
        assert_eq!(aggregate(&segments, &context), aggregate(&segments, &context));
    }
}
