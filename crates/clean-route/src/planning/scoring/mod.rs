//! Remote scoring with a deterministic local fallback.

mod client;
mod local;
mod wire;

pub use client::{
    ConfiguredScoring, DisabledScoring, HttpScoringClient, ScoringClient, ScoringUnavailable,
};
pub use local::{answer_scoring_request, local_costs, score_locally};
pub use wire::{ScoringRequest, WireRoute, WireScoredRoute, WireSegment};

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use super::domain::{CandidateRoute, ScoredRoute, TravelContext};

pub const DEFAULT_SCORING_TIMEOUT: Duration = Duration::from_secs(3);

/// Where a pass's costs came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringSource {
    Remote,
    Local,
}

/// Result of one scoring pass. Both variants carry a full set of scored routes.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutcome {
    Remote(Vec<ScoredRoute>),
    Fallback {
        routes: Vec<ScoredRoute>,
        cause: ScoringUnavailable,
    },
}

impl ScoreOutcome {
    pub fn source(&self) -> ScoringSource {
        match self {
            Self::Remote(_) => ScoringSource::Remote,
            Self::Fallback { .. } => ScoringSource::Local,
        }
    }

    pub fn routes(&self) -> &[ScoredRoute] {
        match self {
            Self::Remote(routes) => routes,
            Self::Fallback { routes, .. } => routes,
        }
    }

    pub fn into_routes(self) -> Vec<ScoredRoute> {
        match self {
            Self::Remote(routes) => routes,
            Self::Fallback { routes, .. } => routes,
        }
    }
}

/// Produces a scored route for every candidate, preferring the remote scorer.
#[derive(Debug)]
pub struct ScoringOrchestrator<S> {
    client: Arc<S>,
    timeout: Duration,
}

impl<S> ScoringOrchestrator<S>
where
    S: ScoringClient + 'static,
{
    pub fn new(client: Arc<S>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub async fn score(&self, pool: Vec<CandidateRoute>, context: &TravelContext) -> ScoreOutcome {
        let request = ScoringRequest::from_pool(&pool, context.transport_mode, context.is_peak);

        let remote = match tokio::time::timeout(self.timeout, self.client.score(&request)).await {
            Ok(result) => result,
            Err(_) => Err(ScoringUnavailable::TimedOut(self.timeout)),
        };

        match remote.and_then(|annotated| adopt_remote_costs(&pool, annotated)) {
            Ok(routes) => {
                debug!(candidates = routes.len(), "adopted remote route costs");
                ScoreOutcome::Remote(routes)
            }
            Err(cause) => {
                if cause == ScoringUnavailable::Disabled {
                    debug!(candidates = pool.len(), "remote scoring disabled, scoring locally");
                } else {
                    warn!(
                        %cause,
                        candidates = pool.len(),
                        "remote scoring failed, scoring locally"
                    );
                }
                let routes = score_locally(pool, context);
                ScoreOutcome::Fallback { routes, cause }
            }
        }
    }
}

/// Pair remote costs with the pool by position, rejecting anything malformed.
fn adopt_remote_costs(
    pool: &[CandidateRoute],
    annotated: Vec<WireScoredRoute>,
) -> Result<Vec<ScoredRoute>, ScoringUnavailable> {
    if annotated.len() != pool.len() {
        return Err(ScoringUnavailable::Malformed(format!(
            "expected {} scored routes, received {}",
            pool.len(),
            annotated.len()
        )));
    }

    pool.iter()
        .zip(annotated)
        .enumerate()
        .map(|(index, (candidate, scored))| {
            let costs = scored.costs();
            if !costs.is_well_formed() {
                return Err(ScoringUnavailable::Malformed(format!(
                    "route {index} has invalid costs {costs:?}"
                )));
            }

            let mut candidate = candidate.clone();
            if let Some(score) = scored.route.pollution_score {
                if !score.is_finite() || score < 0.0 {
                    return Err(ScoringUnavailable::Malformed(format!(
                        "route {index} has invalid pollution score {score}"
                    )));
                }
                candidate.pollution_score = Some(score);
            }

            Ok(ScoredRoute { candidate, costs })
        })
        .collect()
}
