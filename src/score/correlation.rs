//! Cross-domain amplifier.
//!
//! Individual scorers are deliberately blind to each other; some hazard pairs
//! are worse together than their sum suggests. This pass looks at a handful of
//! known-bad combinations and awards extra points on top of the per-domain
//! factors. Each rule can be switched off independently.

use crate::assessment::{FactorCategory, RiskFactor};
use crate::options::AmplificationRules;

const ICING_LOW_CEILING_POINTS: f64 = 10.0;
const THUNDERSTORM_HIGH_WIND_POINTS: f64 = 15.0;
const DENSITY_ALTITUDE_WIND_POINTS: f64 = 10.0;

const WIND_POINTS_THRESHOLD: f64 = 15.0;
const DA_POINTS_THRESHOLD: f64 = 20.0;

/// Per-domain signals the amplifier inspects, extracted from the factor set.
/// Wind is measured in awarded points, not raw speed: a modest crosswind that
/// scores heavily matters as much as a strong headwind that scores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainSignals {
    pub wind_points: f64,
    pub da_points: f64,
    pub icing_points: f64,
    pub ceiling_points: f64,
    pub thunderstorm: bool,
}

/// Apply the correlation rules. Returns `None` when no rule fires.
pub fn amplify(
    signals: &DomainSignals,
    rules: &AmplificationRules,
    cap: f64,
) -> Option<RiskFactor> {
    let mut points = 0.0;
    let mut reasons = Vec::new();

    if rules.icing_low_ceiling && signals.icing_points > 0.0 && signals.ceiling_points > 0.0 {
        points += ICING_LOW_CEILING_POINTS;
        reasons.push("Icing conditions with a low ceiling compound the hazard".to_string());
    }
    if rules.thunderstorm_high_wind
        && signals.thunderstorm
        && signals.wind_points > WIND_POINTS_THRESHOLD
    {
        points += THUNDERSTORM_HIGH_WIND_POINTS;
        reasons.push("Thunderstorm with strong surface winds".to_string());
    }
    if rules.density_altitude_wind
        && signals.da_points > DA_POINTS_THRESHOLD
        && signals.wind_points > WIND_POINTS_THRESHOLD
    {
        points += DENSITY_ALTITUDE_WIND_POINTS;
        reasons.push("High density altitude with strong winds degrades climb margin".to_string());
    }

    if points == 0.0 {
        return None;
    }
    let mut factor = RiskFactor::new(FactorCategory::Amplification, points, cap);
    factor.reasons = reasons;
    Some(factor)
}
