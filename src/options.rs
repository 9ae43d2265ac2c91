//! Caller-tunable knobs for a single assessment.
//!
//! The source material disagrees with itself about some historical cap values,
//! so every cap is an explicit, overridable constant here rather than a magic
//! number buried in a scorer.

use crate::assessment::FactorCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default per-category point caps (pre-amplification).
pub const WIND_CAP: f64 = 100.0; // sub-caps live in the wind scorer
pub const ATMOSPHERE_CAP: f64 = 120.0; // DA 30 + trend 15 + thermal 20 + stability 30 + temp 25
pub const PHENOMENA_CAP: f64 = 100.0;
pub const RUNWAY_CAP: f64 = 35.0;
pub const TEMPORAL_CAP: f64 = 30.0;
pub const NOTAM_CAP: f64 = 25.0;
pub const AMPLIFICATION_CAP: f64 = 25.0;

/// Named cross-domain amplification rules; each can be disabled independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmplificationRules {
    /// Icing points + low-ceiling points: instrument approach risk (+10).
    pub icing_low_ceiling: bool,
    /// Thunderstorm with significant wind factors (+15).
    pub thunderstorm_high_wind: bool,
    /// High density altitude with challenging winds (+10).
    pub density_altitude_wind: bool,
}

impl Default for AmplificationRules {
    fn default() -> Self {
        Self {
            icing_low_ceiling: true,
            thunderstorm_high_wind: true,
            density_altitude_wind: true,
        }
    }
}

/// Options for one deterministic assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessOptions {
    /// Per-category cap overrides; categories absent here use the defaults.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub cap_overrides: BTreeMap<FactorCategory, f64>,
    #[serde(default)]
    pub amplification: AmplificationRules,
    /// Replaces the pilot profile's threshold multiplier when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold_multiplier_override: Option<f64>,
}

impl Default for AssessOptions {
    fn default() -> Self {
        Self {
            cap_overrides: BTreeMap::new(),
            amplification: AmplificationRules::default(),
            threshold_multiplier_override: None,
        }
    }
}

impl AssessOptions {
    /// Effective cap for a category after overrides.
    pub fn cap(&self, category: FactorCategory) -> f64 {
        if let Some(&c) = self.cap_overrides.get(&category) {
            return c;
        }
        match category {
            FactorCategory::Wind => WIND_CAP,
            FactorCategory::Atmosphere => ATMOSPHERE_CAP,
            FactorCategory::Phenomena => PHENOMENA_CAP,
            FactorCategory::RunwayPerformance => RUNWAY_CAP,
            FactorCategory::Temporal => TEMPORAL_CAP,
            FactorCategory::Notam => NOTAM_CAP,
            FactorCategory::Amplification => AMPLIFICATION_CAP,
        }
    }
}

/// Options for the Monte Carlo estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyOptions {
    /// Trial count; cost scales linearly.
    pub iterations: usize,
    /// PRNG seed. Identical seed + inputs reproduce the estimate bit for bit.
    pub seed: u64,
    /// Also run the 1..=6 hour temporal-evolution scenarios.
    pub include_temporal: bool,
}

impl Default for UncertaintyOptions {
    fn default() -> Self {
        Self {
            iterations: 500,
            seed: 0,
            include_temporal: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_override_wins_over_default() {
        let mut opts = AssessOptions::default();
        assert_eq!(opts.cap(FactorCategory::RunwayPerformance), RUNWAY_CAP);
        opts.cap_overrides
            .insert(FactorCategory::RunwayPerformance, 20.0);
        assert_eq!(opts.cap(FactorCategory::RunwayPerformance), 20.0);
    }
}
