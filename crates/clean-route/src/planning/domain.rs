use serde::{Deserialize, Deserializer, Serialize};

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// How the traveler moves; drives both the routing profile and personal exposure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportMode {
    #[default]
    Car,
    Bike,
    Walk,
}

impl TransportMode {
    pub const fn ordered() -> [Self; 3] {
        [Self::Car, Self::Bike, Self::Walk]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Car => "Car",
            Self::Bike => "Bike",
            Self::Walk => "Walk",
        }
    }

    /// Slower, unenclosed modes spend longer breathing each segment.
    pub const fn exposure_multiplier(self) -> f64 {
        match self {
            Self::Car => 1.0,
            Self::Bike => 1.1,
            Self::Walk => 1.2,
        }
    }

    pub const fn base_profile(self) -> RouteProfile {
        match self {
            Self::Car => RouteProfile::Driving,
            Self::Bike => RouteProfile::Bicycle,
            Self::Walk => RouteProfile::Foot,
        }
    }

    /// Routing profiles fetched for this mode: the base profile first, then a
    /// contrasting profile when it differs.
    pub fn attempted_profiles(self) -> Vec<RouteProfile> {
        let base = self.base_profile();
        let contrast = base.contrast();
        if contrast == base {
            vec![base]
        } else {
            vec![base, contrast]
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "car" | "driving" | "drive" => Some(Self::Car),
            "bike" | "bicycle" | "cycling" => Some(Self::Bike),
            "walk" | "foot" | "walking" => Some(Self::Walk),
            _ => None,
        }
    }
}

/// Routing profile understood by the geometry collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteProfile {
    Driving,
    Bicycle,
    Foot,
}

impl RouteProfile {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Bicycle => "bicycle",
            Self::Foot => "foot",
        }
    }

    pub const fn is_motorized(self) -> bool {
        matches!(self, Self::Driving)
    }

    pub const fn contrast(self) -> Self {
        match self {
            Self::Driving => Self::Bicycle,
            Self::Bicycle | Self::Foot => Self::Foot,
        }
    }

    /// Road-class tag attached to synthesized segments.
    pub const fn road_class(self) -> &'static str {
        if self.is_motorized() {
            "Main Road"
        } else {
            "Local Way"
        }
    }

    /// Road-class pollution multiplier attached to synthesized segments.
    pub const fn segment_weight(self) -> f64 {
        if self.is_motorized() {
            1.0
        } else {
            0.6
        }
    }
}

/// Personal sensitivity to pollution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VulnerabilityProfile {
    #[default]
    Normal,
    Child,
    Elderly,
    Asthmatic,
}

impl VulnerabilityProfile {
    pub const fn ordered() -> [Self; 4] {
        [Self::Normal, Self::Child, Self::Elderly, Self::Asthmatic]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Child => "Child",
            Self::Elderly => "Elderly",
            Self::Asthmatic => "Asthmatic",
        }
    }

    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Normal => 1.0,
            Self::Child => 1.5,
            Self::Elderly => 1.6,
            Self::Asthmatic => 1.8,
        }
    }

    /// Unrecognized labels fall back to [`VulnerabilityProfile::Normal`].
    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CHILD" => Self::Child,
            "ELDERLY" => Self::Elderly,
            "ASTHMATIC" => Self::Asthmatic,
            _ => Self::Normal,
        }
    }
}

impl<'de> Deserialize<'de> for VulnerabilityProfile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_label(&raw))
    }
}

/// Everything about the traveler that changes how exposure is weighted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelContext {
    #[serde(default)]
    pub transport_mode: TransportMode,
    #[serde(default)]
    pub is_peak: bool,
    #[serde(default)]
    pub vulnerability: VulnerabilityProfile,
}

/// Free-text trip endpoints plus the travel context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub origin: String,
    pub destination: String,
    #[serde(flatten)]
    pub context: TravelContext,
}

/// A single traversable unit of a route. Immutable once synthesized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub name: String,
    pub road_class: String,
    pub density: f64,
    pub congestion: f64,
    pub weight: f64,
    pub length_km: f64,
    #[serde(default)]
    pub duration_secs: f64,
    pub coordinates: Vec<Coordinate>,
}

/// One geometrically distinct path for a routing profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRoute {
    pub profile: RouteProfile,
    pub segments: Vec<Segment>,
    pub total_distance_m: f64,
    pub total_duration_secs: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pollution_score: Option<f64>,
}

/// Weight of pollution in the combined cost.
pub const POLLUTION_COST_WEIGHT: f64 = 0.6;
/// Weight of travel time in the combined cost.
pub const TIME_COST_WEIGHT: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteCosts {
    pub pollution: f64,
    pub time: f64,
    pub combined: f64,
}

impl RouteCosts {
    pub fn weighted(pollution: f64, time: f64) -> Self {
        Self {
            pollution,
            time,
            combined: pollution * POLLUTION_COST_WEIGHT + time * TIME_COST_WEIGHT,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        [self.pollution, self.time, self.combined]
            .iter()
            .all(|value| value.is_finite() && *value >= 0.0)
    }
}

/// Candidate augmented with the costs of one scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRoute {
    pub candidate: CandidateRoute,
    pub costs: RouteCosts,
}

/// Why a route was picked for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    Fastest,
    Cleanest,
    Average,
}

impl Strategy {
    pub const fn ordered() -> [Self; 3] {
        [Self::Fastest, Self::Cleanest, Self::Average]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Fastest => "Fastest",
            Self::Cleanest => "Cleanest",
            Self::Average => "Average",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Fastest => "#00ffcc",
            Self::Cleanest => "#39ff14",
            Self::Average => "#ffb86c",
        }
    }
}

/// Route-level totals shown to the traveler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteMetrics {
    pub total_exposure: f64,
    pub exposure_per_km: f64,
    pub distance_km: f64,
    pub risk_index: f64,
    pub duration_secs: u64,
}

/// A scored route selected under a strategy label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalRoute {
    pub id: usize,
    pub strategy: Strategy,
    pub color: String,
    pub route: ScoredRoute,
    pub metrics: RouteMetrics,
}

impl FinalRoute {
    pub fn segments(&self) -> &[Segment] {
        &self.route.candidate.segments
    }
}
