use super::domain::{FinalRoute, ScoredRoute, Strategy, TravelContext};
use super::metrics::display_metrics;

/// Distance gap beyond which two routes of the same profile count as distinct.
pub const DIVERSITY_DISTANCE_M: f64 = 100.0;

/// Two routes are meaningfully different when they use different profiles or their
/// total distances differ by more than [`DIVERSITY_DISTANCE_M`].
pub fn is_diverse(a: &ScoredRoute, b: &ScoredRoute) -> bool {
    a.candidate.profile != b.candidate.profile
        || (a.candidate.total_distance_m - b.candidate.total_distance_m).abs()
            > DIVERSITY_DISTANCE_M
}

/// The three presented routes, always ordered Fastest, Cleanest, Average.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSelection {
    routes: [FinalRoute; 3],
}

impl RouteSelection {
    pub fn routes(&self) -> &[FinalRoute; 3] {
        &self.routes
    }

    pub fn into_routes(self) -> Vec<FinalRoute> {
        self.routes.into()
    }

    pub fn get(&self, strategy: Strategy) -> &FinalRoute {
        match strategy {
            Strategy::Fastest => &self.routes[0],
            Strategy::Cleanest => &self.routes[1],
            Strategy::Average => &self.routes[2],
        }
    }
}

/// Pool indices picked for each strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedIndices {
    pub fastest: usize,
    pub cleanest: usize,
    pub average: usize,
}

/// Pick Fastest, Cleanest and Average from the pool. Ties keep pool order.
pub fn pick_indices(pool: &[ScoredRoute]) -> Option<SelectedIndices> {
    if pool.is_empty() {
        return None;
    }

    let by_time = ranked(pool, |route| route.costs.time);
    let by_pollution = ranked(pool, |route| route.costs.pollution);
    let by_combined = ranked(pool, |route| route.costs.combined);

    let fastest = by_time[0];

    let cleanest = by_pollution
        .iter()
        .copied()
        .find(|&index| is_diverse(&pool[index], &pool[fastest]))
        .or_else(|| by_pollution.get(1).copied())
        .unwrap_or(by_pollution[0]);

    let average = by_combined
        .iter()
        .copied()
        .find(|&index| {
            is_diverse(&pool[index], &pool[fastest]) && is_diverse(&pool[index], &pool[cleanest])
        })
        .or_else(|| {
            by_combined
                .iter()
                .copied()
                .find(|&index| index != fastest && index != cleanest)
        })
        .or_else(|| by_combined.get(1).copied())
        .unwrap_or(by_combined[0]);

    Some(SelectedIndices {
        fastest,
        cleanest,
        average,
    })
}

/// Select three strategically distinct routes and compute their display metrics.
pub fn select_diverse_routes(
    pool: &[ScoredRoute],
    context: &TravelContext,
) -> Option<RouteSelection> {
    let indices = pick_indices(pool)?;

    let build = |id: usize, strategy: Strategy, index: usize| {
        let route = pool[index].clone();
        let metrics = display_metrics(
            &route.candidate.segments,
            context,
            route.candidate.pollution_score,
        );
        FinalRoute {
            id,
            strategy,
            color: strategy.color().to_string(),
            route,
            metrics,
        }
    };

    Some(RouteSelection {
        routes: [
            build(0, Strategy::Fastest, indices.fastest),
            build(1, Strategy::Cleanest, indices.cleanest),
            build(2, Strategy::Average, indices.average),
        ],
    })
}

fn ranked<F>(pool: &[ScoredRoute], key: F) -> Vec<usize>
where
    F: Fn(&ScoredRoute) -> f64,
{
    let mut order: Vec<usize> = (0..pool.len()).collect();
    order.sort_by(|&a, &b| key(&pool[a]).total_cmp(&key(&pool[b])));
    order
}
