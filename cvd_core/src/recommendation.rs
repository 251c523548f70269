//! Risk tiers and the clinical recommendation attached to each.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound (inclusive) of the high-risk tier, in percent
pub const HIGH_RISK_THRESHOLD: f64 = 20.0;

/// Lower bound (inclusive) of the very-high-risk tier, in percent
pub const VERY_HIGH_RISK_THRESHOLD: f64 = 30.0;

/// Recommendation tier for a post-treatment risk
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationTier {
    Moderate,
    High,
    VeryHigh,
}

impl RecommendationTier {
    /// Select the tier for `final_risk`, checking the highest threshold first
    ///
    /// Values that satisfy no threshold (including NaN) fall into `Moderate`.
    pub fn for_risk(final_risk: f64) -> Self {
        if final_risk >= VERY_HIGH_RISK_THRESHOLD {
            RecommendationTier::VeryHigh
        } else if final_risk >= HIGH_RISK_THRESHOLD {
            RecommendationTier::High
        } else {
            RecommendationTier::Moderate
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RecommendationTier::VeryHigh => "Very High Risk",
            RecommendationTier::High => "High Risk",
            RecommendationTier::Moderate => "Moderate Risk",
        }
    }

    /// Management advice for this tier
    pub fn advice(self) -> &'static str {
        match self {
            RecommendationTier::VeryHigh => {
                "High-intensity statin, PCSK9 inhibitor, SBP <130 mmHg."
            }
            RecommendationTier::High => "Moderate-intensity statin, SBP <130 mmHg.",
            RecommendationTier::Moderate => "Lifestyle adherence, annual reassessment.",
        }
    }

    /// Full recommendation text, e.g. "High Risk: Moderate-intensity statin, SBP <130 mmHg."
    pub fn recommendation(self) -> String {
        format!("{}: {}", self.label(), self.advice())
    }
}

impl fmt::Display for RecommendationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Recommendation text for a post-treatment risk percentage
pub fn generate_recommendation(final_risk: f64) -> String {
    RecommendationTier::for_risk(final_risk).recommendation()
}
