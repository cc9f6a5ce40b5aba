use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::planning::domain::RouteProfile;
use crate::planning::formula::round_to;

/// Traffic attributes attached to one synthesized segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrafficSample {
    pub density: f64,
    pub congestion: f64,
}

/// Source of per-segment traffic figures the routing collaborator does not supply.
pub trait TrafficModel: Send + Sync {
    fn sample(&self, profile: RouteProfile) -> TrafficSample;
}

/// Placeholder for real traffic telemetry: uniform draws from profile-dependent ranges.
///
/// Motorized profiles draw density from 25..95 and congestion from 1.0..=2.8; the
/// others draw density from 5..35 and congestion from 1.0..=1.6.
#[derive(Debug)]
pub struct RandomTraffic {
    rng: Mutex<StdRng>,
}

impl RandomTraffic {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomTraffic {
    fn default() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }
}

impl TrafficModel for RandomTraffic {
    fn sample(&self, profile: RouteProfile) -> TrafficSample {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let (density_range, congestion_spread) = if profile.is_motorized() {
            (25..95, 1.8)
        } else {
            (5..35, 0.6)
        };

        let density = rng.gen_range(density_range) as f64;
        let congestion = round_to(1.0 + rng.gen::<f64>() * congestion_spread, 1);

        TrafficSample {
            density,
            congestion,
        }
    }
}

/// Injected traffic figures, identical for every segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTraffic(pub TrafficSample);

impl FixedTraffic {
    pub fn new(density: f64, congestion: f64) -> Self {
        Self(TrafficSample {
            density,
            congestion,
        })
    }
}

impl TrafficModel for FixedTraffic {
    fn sample(&self, _profile: RouteProfile) -> TrafficSample {
        self.0
    }
}
