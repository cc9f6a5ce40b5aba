//! Synthetic road data for offline demos and exploratory runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::domain::{CandidateRoute, Coordinate, RouteProfile, Segment};
use super::formula::round_to;

/// Default start point used by the demo (Mumbai).
pub const DEFAULT_START: Coordinate = Coordinate::new(19.076, 72.8777);

const ROAD_TYPES: [&str; 4] = ["Residential", "Main Road", "Highway", "Sensitive Zone"];
const STEP_SPREAD_DEG: f64 = 0.05;
const ALTERNATIVES_PER_PROFILE: usize = 2;

fn road_weight(road_type: &str) -> f64 {
    match road_type {
        "Sensitive Zone" => 1.5,
        "Highway" => 1.2,
        _ => 1.0,
    }
}

fn cruising_speed_kmh(profile: RouteProfile) -> f64 {
    match profile {
        RouteProfile::Driving => 40.0,
        RouteProfile::Bicycle => 15.0,
        RouteProfile::Foot => 5.0,
    }
}

/// Generate a chained path of `count` random segments starting at `start`.
///
/// Density is drawn from 1..=10, congestion from 1.0..3.0 and length from 0.5..2.5 km.
/// Durations are left at zero; [`simulated_pool`] fills them in per profile.
pub fn generate_simulated_roads<G>(count: usize, start: Coordinate, rng: &mut G) -> Vec<Segment>
where
    G: Rng + ?Sized,
{
    let mut current = start;
    let mut roads = Vec::with_capacity(count);

    for index in 0..count {
        let road_type = ROAD_TYPES[rng.gen_range(0..ROAD_TYPES.len())];
        let density = rng.gen_range(1..=10) as f64;
        let congestion = round_to(rng.gen::<f64>() * 2.0 + 1.0, 1);
        let length_km = round_to(rng.gen::<f64>() * 2.0 + 0.5, 2);

        let next = Coordinate::new(
            current.lat + (rng.gen::<f64>() - 0.5) * STEP_SPREAD_DEG,
            current.lon + (rng.gen::<f64>() - 0.5) * STEP_SPREAD_DEG,
        );

        roads.push(Segment {
            id: format!("road-{index}"),
            name: format!("{road_type} Segment {}", index + 1),
            road_class: road_type.to_string(),
            density,
            congestion,
            weight: road_weight(road_type),
            length_km,
            duration_secs: 0.0,
            coordinates: vec![current, next],
        });

        current = next;
    }

    roads
}

/// A reproducible candidate pool: two simulated alternatives for every profile.
pub fn simulated_pool(seed: u64, segments_per_route: usize) -> Vec<CandidateRoute> {
    let mut rng = StdRng::seed_from_u64(seed);
    let profiles = [RouteProfile::Driving, RouteProfile::Bicycle, RouteProfile::Foot];

    let mut pool = Vec::with_capacity(profiles.len() * ALTERNATIVES_PER_PROFILE);
    for profile in profiles {
        let speed = cruising_speed_kmh(profile);
        for _ in 0..ALTERNATIVES_PER_PROFILE {
            let mut segments =
                generate_simulated_roads(segments_per_route, DEFAULT_START, &mut rng);
            for segment in &mut segments {
                segment.duration_secs = round_to(segment.length_km / speed * 3600.0, 1);
            }

            let total_distance_m: f64 = segments.iter().map(|s| s.length_km * 1000.0).sum();
            let total_duration_secs: f64 = segments.iter().map(|s| s.duration_secs).sum();

            pool.push(CandidateRoute {
                profile,
                segments,
                total_distance_m,
                total_duration_secs,
                pollution_score: None,
            });
        }
    }

    pool
}
