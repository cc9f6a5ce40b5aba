//! Pure exposure formulas. Every function here is deterministic and side-effect free.

use serde::Serialize;

/// Exposure at which the risk index saturates.
pub const MAX_SAFE_EXPOSURE: f64 = 400.0;
pub const PEAK_HOUR_FACTOR: f64 = 1.3;
pub const OFF_PEAK_FACTOR: f64 = 1.0;

pub fn road_pollution(density: f64, congestion: f64, weight: f64) -> f64 {
    density * congestion * weight
}

pub fn health_exposure(base_pollution: f64, vulnerability_multiplier: f64) -> f64 {
    base_pollution * vulnerability_multiplier
}

pub fn adjusted_pollution(health_exposure: f64, is_peak: bool) -> f64 {
    let factor = if is_peak {
        PEAK_HOUR_FACTOR
    } else {
        OFF_PEAK_FACTOR
    };
    health_exposure * factor
}

/// Exposure normalized onto a 0-10 scale, rounded to one decimal.
pub fn risk_index(total_exposure: f64) -> f64 {
    let scaled = (total_exposure / MAX_SAFE_EXPOSURE * 10.0).clamp(0.0, 10.0);
    round_to(scaled, 1)
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Categorical severity used to color road segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBand {
    Low,
    Medium,
    High,
    /// Not a harsher "high": the segment crosses a zone that needs separate handling.
    SensitiveZone,
}

impl SeverityBand {
    pub fn for_score(score: f64) -> Self {
        if score < 40.0 {
            Self::Low
        } else if score < 80.0 {
            Self::Medium
        } else if score < 120.0 {
            Self::High
        } else {
            Self::SensitiveZone
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "#50fa7b",
            Self::Medium => "#ffb86c",
            Self::High => "#ff4b4b",
            Self::SensitiveZone => "#bd93f9",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::SensitiveZone => "Sensitive Zone",
        }
    }

    pub const fn requires_special_handling(self) -> bool {
        matches!(self, Self::SensitiveZone)
    }
}

pub fn color_for_score(score: f64) -> &'static str {
    SeverityBand::for_score(score).color()
}

/// Coarse wording for an exposure score on the analytics summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExposureRating {
    Low,
    Moderate,
    High,
    Critical,
}

impl ExposureRating {
    pub fn for_score(score: f64) -> Self {
        if score < 30.0 {
            Self::Low
        } else if score < 60.0 {
            Self::Moderate
        } else if score < 85.0 {
            Self::High
        } else {
            Self::Critical
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}
