//! Scorer pipeline entry.
//!
//! Each submodule is a stateless evaluator for one risk domain: given
//! normalized inputs it returns awarded points, the cap they were held to and
//! rationale strings. The scorers are independent and order-insensitive; this
//! module runs them all for one runway candidate and hands the bundle to the
//! aggregator in `engine`.

pub mod atmosphere;
pub mod correlation;
pub mod notam;
pub mod phenomena;
pub mod runway;
pub mod solar;
pub mod wind;

use crate::assessment::{FactorCategory, RiskFactor};
use crate::error::EngineError;
use crate::observation::{Airfield, RunwayCandidate, WeatherObservation};
use crate::options::AssessOptions;
use crate::profile::AircraftProfile;
use std::collections::BTreeMap;
use tracing::debug;

// Re-export the pieces the engine and estimator reach for.
pub use wind::WindComponents;

/// Borrowed inputs for scoring one runway candidate.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    pub obs: &'a WeatherObservation,
    pub airfield: &'a Airfield,
    pub runway: &'a RunwayCandidate,
    pub aircraft: &'a AircraftProfile,
    pub notams: &'a [String],
    pub options: &'a AssessOptions,
}

/// Raw output of the scorer pipeline, before aggregation/classification.
#[derive(Debug, Clone)]
pub struct ScoreBundle {
    /// Factors in pipeline order; skipped scorers contribute no entry.
    pub factors: Vec<RiskFactor>,
    /// Set when an automatic-extreme phenomenon was observed; the aggregator
    /// overrides the sum to 100 / NO-GO.
    pub automatic_extreme: Option<phenomena::ExtremePhenomenon>,
    /// Field name -> input availability, merged into diagnostics.
    pub availability: BTreeMap<String, bool>,
    pub headwind_kt: Option<f64>,
    pub crosswind_kt: Option<f64>,
    pub density_altitude_ft: Option<f64>,
}

impl ScoreBundle {
    /// Raw point sum over all factors (caps already applied per factor).
    pub fn total_points(&self) -> f64 {
        self.factors.iter().map(|f| f.points).sum()
    }
}

/// Run every factor scorer for one runway and collect the bundle.
///
/// Fails only on out-of-range numeric inputs; missing fields degrade into
/// availability flags.
pub fn score_runway(input: &ScoreInput<'_>) -> Result<ScoreBundle, EngineError> {
    let obs = input.obs;
    let mut factors = Vec::new();
    let mut availability = BTreeMap::new();

    // Wind/gust decomposition and scoring.
    let mut headwind = None;
    let mut crosswind = None;
    match obs.wind {
        Some(w) => {
            availability.insert("wind".to_string(), true);
            let (factor, components) =
                wind::score(input.runway.heading_deg, &w, input.options.cap(FactorCategory::Wind));
            headwind = Some(components.headwind_kt);
            crosswind = Some(components.crosswind_kt);
            push_nonzero(&mut factors, factor);
        }
        None => {
            availability.insert("wind".to_string(), false);
        }
    }

    // Atmosphere: density altitude, pressure trend, thermal gradient,
    // stability, temperature. Temperature alone is enough for the thermal
    // sub-scores; density altitude additionally needs the altimeter setting.
    let mut da_diff = 0.0;
    let mut density_altitude = None;
    availability.insert("altimeter".to_string(), obs.altimeter_in_hg.is_some());
    match obs.temp_c {
        Some(temp) => {
            availability.insert("temperature".to_string(), true);
            let scored = atmosphere::score(
                obs,
                input.airfield,
                temp,
                obs.altimeter_in_hg,
                input.options.cap(FactorCategory::Atmosphere),
            )?;
            da_diff = scored.da_diff_ft;
            density_altitude = scored.density_altitude_ft;
            push_nonzero(&mut factors, scored.factor);
        }
        None => {
            availability.insert("temperature".to_string(), false);
        }
    }

    // Weather phenomena, ceiling and visibility.
    availability.insert("visibility".to_string(), obs.visibility_sm.is_some());
    availability.insert("ceiling".to_string(), obs.ceiling_ft().is_some());
    let wx = phenomena::score(
        obs,
        input.runway.terrain_factor,
        input.options.cap(FactorCategory::Phenomena),
    );
    push_nonzero(&mut factors, wx.factor.clone());

    // Runway performance against the aircraft requirement.
    availability.insert(
        "runway_length".to_string(),
        input.runway.length_ft.is_some(),
    );
    let rwy_factor = runway::score(
        input.runway,
        input.aircraft,
        da_diff,
        input.options.cap(FactorCategory::RunwayPerformance),
    );
    push_nonzero(&mut factors, rwy_factor);

    // Temporal: solar position, night/twilight, runway glare.
    match (input.airfield.latitude, input.airfield.longitude) {
        (Some(lat), Some(lon)) => {
            availability.insert("coordinates".to_string(), true);
            let temporal = solar::score(
                obs.observed_at,
                lat,
                lon,
                input.runway.heading_deg,
                input.options.cap(FactorCategory::Temporal),
            );
            push_nonzero(&mut factors, temporal);
        }
        _ => {
            availability.insert("coordinates".to_string(), false);
        }
    }

    // NOTAM text hazards.
    availability.insert("notams".to_string(), !input.notams.is_empty());
    let notam_factor = notam::score(input.notams, input.options.cap(FactorCategory::Notam));
    push_nonzero(&mut factors, notam_factor);

    // Cross-domain amplification runs last, over the factor set.
    let wind_points: f64 = factors
        .iter()
        .filter(|f| f.category == FactorCategory::Wind)
        .map(|f| f.points)
        .sum();
    let da_points = da_diff.max(0.0) * atmosphere::DA_POINTS_PER_FT;
    let amp = correlation::amplify(
        &correlation::DomainSignals {
            wind_points,
            da_points: da_points.min(atmosphere::DA_SUBCAP),
            icing_points: wx.icing_points,
            ceiling_points: wx.ceiling_points,
            thunderstorm: matches!(
                wx.automatic_extreme,
                Some(phenomena::ExtremePhenomenon::Thunderstorm)
            ),
        },
        &input.options.amplification,
        input.options.cap(FactorCategory::Amplification),
    );
    if let Some(a) = amp {
        push_nonzero(&mut factors, a);
    }

    debug!(
        runway = %input.runway.ident,
        factors = factors.len(),
        total = score_total(&factors),
        "scorer pipeline complete"
    );

    Ok(ScoreBundle {
        factors,
        automatic_extreme: wx.automatic_extreme,
        availability,
        headwind_kt: headwind,
        crosswind_kt: crosswind,
        density_altitude_ft: density_altitude,
    })
}

fn score_total(factors: &[RiskFactor]) -> f64 {
    factors.iter().map(|f| f.points).sum()
}

/// Factors with zero points carry no information; drop them to keep the
/// breakdown readable.
fn push_nonzero(factors: &mut Vec<RiskFactor>, factor: RiskFactor) {
    if factor.points > 0.0 {
        factors.push(factor);
    }
}
