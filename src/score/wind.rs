//! Wind/gust scorer: runway-relative decomposition and point award.
//!
//! theta = (wind_dir - runway_heading) mod 360; headwind = v*cos(theta),
//! crosswind = v*sin(theta). Only a tailwind (negative headwind) scores on
//! the longitudinal axis; a positive headwind is free performance.

use crate::assessment::{FactorCategory, RiskFactor};
use crate::observation::Wind;

/// Points per knot and sub-caps. Tailwind dominates by design: one knot of
/// tailwind costs three times a knot of crosswind.
const TAILWIND_PTS_PER_KT: f64 = 6.0;
const TAILWIND_SUBCAP: f64 = 30.0;
const CROSSWIND_PTS_PER_KT: f64 = 2.0;
const CROSSWIND_SUBCAP: f64 = 30.0;
const GUST_DIFF_PTS_PER_KT: f64 = 2.0;
const GUST_DIFF_SUBCAP: f64 = 20.0;
const GUST_TAILWIND_PTS_PER_KT: f64 = 1.0;
const GUST_TAILWIND_SUBCAP: f64 = 10.0;
const GUST_CROSSWIND_PTS_PER_KT: f64 = 0.5;
const GUST_CROSSWIND_SUBCAP: f64 = 10.0;

/// Runway-relative wind decomposition. `headwind_kt` is signed (negative
/// means tailwind); `crosswind_kt` is the unsigned lateral component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindComponents {
    pub headwind_kt: f64,
    pub crosswind_kt: f64,
}

/// Decompose a reported wind onto a runway heading.
pub fn decompose(runway_heading_deg: f64, direction_deg: f64, speed_kt: f64) -> WindComponents {
    let theta = (direction_deg - runway_heading_deg).rem_euclid(360.0).to_radians();
    WindComponents {
        headwind_kt: speed_kt * theta.cos(),
        crosswind_kt: (speed_kt * theta.sin()).abs(),
    }
}

/// Score the wind factor for one runway. Returns the factor plus the steady
/// decomposition for diagnostics.
pub fn score(runway_heading_deg: f64, wind: &Wind, cap: f64) -> (RiskFactor, WindComponents) {
    let steady = decompose(runway_heading_deg, wind.direction_deg, wind.speed_kt);
    let mut points = 0.0;
    let mut reasons = Vec::new();

    if steady.headwind_kt < 0.0 {
        let tail = -steady.headwind_kt;
        let p = (tail * TAILWIND_PTS_PER_KT).min(TAILWIND_SUBCAP);
        if p > 0.0 {
            points += p;
            reasons.push(format!("Tailwind component {:.0} kt", tail));
        }
    }
    if steady.crosswind_kt > 0.0 {
        let p = (steady.crosswind_kt * CROSSWIND_PTS_PER_KT).min(CROSSWIND_SUBCAP);
        points += p;
        reasons.push(format!("Crosswind component {:.0} kt", steady.crosswind_kt));
    }

    if let Some(gust_kt) = wind.gust_kt {
        let gust = decompose(runway_heading_deg, wind.direction_deg, gust_kt);
        let diff = (gust_kt - wind.speed_kt).max(0.0);
        let p = (diff * GUST_DIFF_PTS_PER_KT).min(GUST_DIFF_SUBCAP);
        if p > 0.0 {
            points += p;
            reasons.push(format!(
                "Gusting {:.0} kt over {:.0} kt steady",
                gust_kt, wind.speed_kt
            ));
        }
        if gust.headwind_kt < 0.0 {
            let tail = -gust.headwind_kt;
            let p = (tail * GUST_TAILWIND_PTS_PER_KT).min(GUST_TAILWIND_SUBCAP);
            if p > 0.0 {
                points += p;
                reasons.push(format!("Gust tailwind component {:.0} kt", tail));
            }
        }
        if gust.crosswind_kt > 0.0 {
            let p = (gust.crosswind_kt * GUST_CROSSWIND_PTS_PER_KT).min(GUST_CROSSWIND_SUBCAP);
            if p > 0.0 {
                points += p;
                reasons.push(format!(
                    "Gust crosswind component {:.0} kt",
                    gust.crosswind_kt
                ));
            }
        }
    }

    let mut factor = RiskFactor::new(FactorCategory::Wind, points, cap);
    factor.reasons = reasons;
    (factor, steady)
}
