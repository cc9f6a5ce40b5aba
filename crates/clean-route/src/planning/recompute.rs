use super::domain::{FinalRoute, TravelContext};
use super::metrics::display_metrics;

/// Refresh exposure and risk for already selected routes after a vulnerability change.
///
/// Strategy labels, order, distance and duration are carried over untouched; only
/// the exposure-dependent fields move.
pub fn recompute_metrics(routes: &[FinalRoute], context: &TravelContext) -> Vec<FinalRoute> {
    routes
        .iter()
        .map(|route| {
            let fresh = display_metrics(
                route.segments(),
                context,
                route.route.candidate.pollution_score,
            );

            let mut updated = route.clone();
            updated.metrics.total_exposure = fresh.total_exposure;
            updated.metrics.exposure_per_km = fresh.exposure_per_km;
            updated.metrics.risk_index = fresh.risk_index;
            updated
        })
        .collect()
}
