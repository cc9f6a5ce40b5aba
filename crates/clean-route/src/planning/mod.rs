//! Route exposure scoring and selection.
//!
//! Candidate routes flow from the collaborator adapters in [`providers`] through the
//! [`scoring`] orchestrator into the diverse [`selection`], producing three presented
//! routes. A [`session::TripSession`] decides between a full planning run and a
//! metrics-only recompute when the traveler's context changes.

pub mod domain;
pub mod formula;
pub mod metrics;
pub mod pipeline;
pub mod providers;
pub mod recompute;
pub mod router;
pub mod scoring;
pub mod selection;
pub mod session;
pub mod simulated;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    CandidateRoute, Coordinate, FinalRoute, RouteCosts, RouteMetrics, RouteProfile, ScoredRoute,
    Segment, Strategy, TransportMode, TravelContext, TripRequest, VulnerabilityProfile,
};
pub use formula::{ExposureRating, SeverityBand};
pub use metrics::{aggregate, display_metrics};
pub use pipeline::{Endpoint, PlanningError, RoutePlan, RoutePlanner};
pub use recompute::recompute_metrics;
pub use router::planning_router;
pub use scoring::{
    ConfiguredScoring, DisabledScoring, HttpScoringClient, ScoreOutcome, ScoringClient,
    ScoringOrchestrator, ScoringSource, ScoringUnavailable, DEFAULT_SCORING_TIMEOUT,
};
pub use selection::{select_diverse_routes, RouteSelection};
pub use session::{ContextChange, SessionClosed, SessionHandle, SessionSnapshot, TripSession};
pub use simulated::{generate_simulated_roads, simulated_pool};
pub use views::RoutePlanView;
