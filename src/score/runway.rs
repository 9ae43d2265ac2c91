//! Runway-performance scorer: effective length margin against the aircraft
//! requirement.
//!
//! Effective length = published (or estimated) length, divided by the surface
//! contamination multiplier and by the density-altitude degradation factor.
//! Points ramp up as the margin over the aircraft requirement shrinks.

use crate::assessment::{FactorCategory, RiskFactor};
use crate::observation::RunwayCandidate;
use crate::profile::AircraftProfile;

/// Estimated length when none is published: typical GA runways carry about
/// half again the category requirement.
const ESTIMATE_FACTOR: f64 = 1.5;

/// Degradation only bites above this DA excess.
const DA_DEGRADATION_FLOOR_FT: f64 = 1000.0;

pub fn score(
    runway: &RunwayCandidate,
    aircraft: &AircraftProfile,
    da_diff_ft: f64,
    cap: f64,
) -> RiskFactor {
    let mut points = 0.0;
    let mut reasons = Vec::new();

    let (length, estimated) = match runway.length_ft {
        Some(l) => (l, false),
        None => (aircraft.runway_requirement_ft * ESTIMATE_FACTOR, true),
    };
    if estimated {
        reasons.push(format!(
            "Runway length not published, using {:.0} ft estimate for {:?} category",
            length, aircraft.category
        ));
    }

    let mut effective = length / runway.contamination.length_multiplier();
    if runway.contamination.length_multiplier() > 1.0 {
        reasons.push(format!(
            "Surface contamination ({:?}) shortens effective length to {:.0} ft",
            runway.contamination, effective
        ));
    }

    if da_diff_ft > DA_DEGRADATION_FLOOR_FT {
        effective /= aircraft.degradation.factor(da_diff_ft, 0.0);
        if da_diff_ft > 3000.0 {
            points += 20.0;
            reasons.push(format!(
                "Significant performance degradation at {:.0} ft density altitude excess",
                da_diff_ft
            ));
        } else if da_diff_ft > 2000.0 {
            points += 15.0;
            reasons.push(format!(
                "Notable performance degradation at {:.0} ft density altitude excess",
                da_diff_ft
            ));
        }
    }

    let required = aircraft.runway_requirement_ft;
    let margin = effective / required;
    if margin < 1.0 {
        points += 35.0;
        reasons.push(format!(
            "Effective length {:.0} ft is below the {:.0} ft requirement",
            effective, required
        ));
    } else if margin < 1.15 {
        points += 25.0;
        reasons.push(format!(
            "Effective length {:.0} ft is marginal for the {:.0} ft requirement",
            effective, required
        ));
    } else if margin < 1.3 {
        points += 15.0;
        reasons.push(format!(
            "Effective length {:.0} ft is concerning for the {:.0} ft requirement",
            effective, required
        ));
    } else if margin < 1.5 {
        points += 5.0;
        reasons.push(format!(
            "Effective length {:.0} ft is adequate but tight for the {:.0} ft requirement",
            effective, required
        ));
    }

    let mut factor = RiskFactor::new(FactorCategory::RunwayPerformance, points, cap);
    factor.reasons = reasons;
    factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::Contamination;

    const CAP: f64 = 35.0;

    fn light() -> AircraftProfile {
        AircraftProfile::default() // 2000 ft requirement
    }

    fn rwy(length: Option<f64>, contamination: Contamination) -> RunwayCandidate {
        let mut r = RunwayCandidate::new("17R", 170.0);
        r.length_ft = length;
        r.contamination = contamination;
        r
    }

    #[test]
    fn long_dry_runway_scores_zero() {
        let f = score(&rwy(Some(6000.0), Contamination::Dry), &light(), 0.0, CAP);
        assert_eq!(f.points, 0.0);
    }

    #[test]
    fn ice_contamination_wipes_out_the_margin() {
        // 3500 ft / 2.2 = 1590 ft effective, below the 2000 ft requirement.
        let f = score(&rwy(Some(3500.0), Contamination::Ice), &light(), 0.0, CAP);
        assert_eq!(f.points, 35.0);
    }

    #[test]
    fn wet_runway_tightens_but_keeps_the_margin() {
        // 4000 / 1.15 = 3478 ft effective, margin 1.74: clean.
        let f = score(&rwy(Some(4000.0), Contamination::Wet), &light(), 0.0, CAP);
        assert_eq!(f.points, 0.0);
    }

    #[test]
    fn missing_length_uses_estimate_with_caveat() {
        let f = score(&rwy(None, Contamination::Dry), &light(), 0.0, CAP);
        assert!(f.reasons[0].contains("not published"));
        // 3000 ft estimate over 2000 ft requirement: margin 1.5, no points.
        assert_eq!(f.points, 0.0);
    }

    #[test]
    fn high_density_altitude_degrades_and_scores() {
        let f = score(&rwy(Some(2600.0), Contamination::Dry), &light(), 3500.0, CAP);
        // +20 for the DA excess, plus the shrunken margin penalty, capped.
        assert!(f.points >= 20.0);
        assert!(f.points <= CAP);
        assert!(f.reasons.iter().any(|r| r.contains("degradation")));
    }

    #[test]
    fn points_never_exceed_the_cap() {
        let f = score(&rwy(Some(1200.0), Contamination::Ice), &light(), 5000.0, CAP);
        assert_eq!(f.points, CAP);
    }
}
