use crate::planning::domain::{
    CandidateRoute, RouteCosts, ScoredRoute, TravelContext, VulnerabilityProfile,
};
use crate::planning::metrics::aggregate;

use super::wire::{ScoringRequest, WireRoute, WireScoredRoute};

/// Costs for one candidate computed from the local formulas.
pub fn local_costs(candidate: &CandidateRoute, context: &TravelContext) -> RouteCosts {
    let metrics = aggregate(&candidate.segments, context);
    RouteCosts::weighted(metrics.total_exposure, candidate.total_duration_secs)
}

/// Score every candidate locally, preserving pool order.
pub fn score_locally(pool: Vec<CandidateRoute>, context: &TravelContext) -> Vec<ScoredRoute> {
    pool.into_iter()
        .map(|candidate| {
            let costs = local_costs(&candidate, context);
            ScoredRoute { candidate, costs }
        })
        .collect()
}

/// Answer a batch scoring request with the same formulas the fallback uses.
///
/// The protocol carries no vulnerability profile, so the request is scored for
/// [`VulnerabilityProfile::Normal`].
pub fn answer_scoring_request(request: ScoringRequest) -> Vec<WireScoredRoute> {
    let context = TravelContext {
        transport_mode: request.transport_mode,
        is_peak: request.is_peak,
        vulnerability: VulnerabilityProfile::Normal,
    };

    request
        .routes
        .into_iter()
        .map(|route| {
            let candidate = CandidateRoute::from(route);
            let costs = local_costs(&candidate, &context);
            WireScoredRoute::new(WireRoute::from(&candidate), costs)
        })
        .collect()
}
