//! Output data model: verdict, explainability and top contributors.
//!
//! The shape mirrors what the surrounding briefing layer serializes back to
//! callers: a bounded score, a category/status pair, the per-factor breakdown
//! that justifies it, and diagnostics on what data was actually available.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Risk domain a factor belongs to. Keys in options/caps tables and in the
/// diagnostics ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorCategory {
    Wind,
    Atmosphere,
    Phenomena,
    RunwayPerformance,
    Temporal,
    Notam,
    Amplification,
}

impl FactorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            FactorCategory::Wind => "wind",
            FactorCategory::Atmosphere => "atmosphere",
            FactorCategory::Phenomena => "phenomena",
            FactorCategory::RunwayPerformance => "runway_performance",
            FactorCategory::Temporal => "temporal",
            FactorCategory::Notam => "notam",
            FactorCategory::Amplification => "amplification",
        }
    }
}

/// One scored risk domain: awarded points, the cap they were held to, and the
/// human-readable rationale strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub category: FactorCategory,
    pub points: f64,
    pub cap: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

impl RiskFactor {
    pub fn new(category: FactorCategory, points: f64, cap: f64) -> Self {
        Self {
            category,
            points: points.clamp(0.0, cap),
            cap,
            reasons: Vec::new(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reasons.push(reason.into());
        self
    }
}

/// Risk category band of the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskCategory {
    Low,
    Moderate,
    High,
    Extreme,
}

/// Operational recommendation derived from the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationalStatus {
    #[serde(rename = "GO")]
    Go,
    #[serde(rename = "CAUTION")]
    Caution,
    #[serde(rename = "NO-GO")]
    NoGo,
}

/// Per-call diagnostics: which inputs were present, which factors dominated,
/// and the resolved wind/altitude numbers the briefing layer echoes back.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Field name -> was the input available to its scorer.
    pub data_availability: BTreeMap<String, bool>,
    /// Factor categories ranked by awarded points, highest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub primary_contributors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headwind_kt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crosswind_kt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density_altitude_ft: Option<f64>,
}

/// Complete deterministic assessment for one runway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub runway: String,
    /// Runway Risk Index, clamped to 0..=100.
    pub score: u8,
    pub category: RiskCategory,
    pub status: OperationalStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub factors: Vec<RiskFactor>,
    #[serde(default)]
    pub diagnostics: Diagnostics,
}

impl RiskAssessment {
    /// Points awarded to a category, 0.0 when the factor was skipped.
    pub fn points_for(&self, category: FactorCategory) -> f64 {
        self.factors
            .iter()
            .filter(|f| f.category == category)
            .map(|f| f.points)
            .sum()
    }
}
