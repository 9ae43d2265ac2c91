//! Deterministic assessment entry points: validate, score, aggregate,
//! classify.
//!
//! `assess` evaluates every runway candidate and returns the least risky one;
//! `assess_runway` evaluates exactly one. Both are pure with respect to their
//! inputs: same snapshot in, same verdict out.

use crate::assessment::{
    Diagnostics, FactorCategory, OperationalStatus, RiskAssessment, RiskCategory, RiskFactor,
};
use crate::error::EngineError;
use crate::montecarlo;
use crate::observation::{Airfield, RunwayCandidate, WeatherObservation};
use crate::options::{AssessOptions, UncertaintyOptions};
use crate::profile::{self, AircraftProfile, PilotProfile};
use crate::score::{self, ScoreBundle, ScoreInput};
use crate::stats::UncertaintyEstimate;
use tracing::info;

/// Classification boundaries at the standard threshold multiplier.
const LOW_BOUNDARY: f64 = 25.0;
const MODERATE_BOUNDARY: f64 = 50.0;
const HIGH_BOUNDARY: f64 = 75.0;

/// Everything one assessment call needs.
#[derive(Debug, Clone)]
pub struct AssessmentInput {
    pub observation: WeatherObservation,
    pub airfield: Airfield,
    pub runways: Vec<RunwayCandidate>,
    pub notams: Vec<String>,
    /// Aircraft category name or type alias; `None` means the generic light
    /// profile.
    pub aircraft: Option<String>,
    /// Pilot experience band or certificate alias.
    pub pilot: Option<String>,
    pub options: AssessOptions,
}

impl AssessmentInput {
    pub fn new(
        observation: WeatherObservation,
        airfield: Airfield,
        runways: Vec<RunwayCandidate>,
    ) -> Self {
        Self {
            observation,
            airfield,
            runways,
            notams: Vec::new(),
            aircraft: None,
            pilot: None,
            options: AssessOptions::default(),
        }
    }
}

/// Assess every runway candidate and return the one with the lowest score.
/// Ties keep the earliest candidate in the list.
pub fn assess(input: &AssessmentInput) -> Result<RiskAssessment, EngineError> {
    let (aircraft, pilot) = resolve_profiles(input)?;
    validate(input)?;

    let mut best: Option<RiskAssessment> = None;
    for runway in &input.runways {
        let assessment = assess_candidate(input, runway, &aircraft, &pilot)?;
        let better = match &best {
            Some(b) => assessment.score < b.score,
            None => true,
        };
        if better {
            best = Some(assessment);
        }
    }

    let best = best.ok_or(EngineError::NoRunway)?;
    info!(
        runway = %best.runway,
        score = best.score,
        category = ?best.category,
        status = ?best.status,
        "runway assessment complete"
    );
    Ok(best)
}

/// Assess one specific runway candidate.
pub fn assess_runway(
    input: &AssessmentInput,
    runway: &RunwayCandidate,
) -> Result<RiskAssessment, EngineError> {
    let (aircraft, pilot) = resolve_profiles(input)?;
    validate(input)?;
    assess_candidate(input, runway, &aircraft, &pilot)
}

/// Deterministic assessment of the best runway plus a Monte Carlo uncertainty
/// estimate around it.
pub fn assess_with_uncertainty(
    input: &AssessmentInput,
    uncertainty: &UncertaintyOptions,
) -> Result<(RiskAssessment, UncertaintyEstimate), EngineError> {
    let assessment = assess(input)?;
    let runway = input
        .runways
        .iter()
        .find(|r| r.ident == assessment.runway)
        .ok_or(EngineError::NoRunway)?;
    let estimate = montecarlo::estimate(input, runway, uncertainty)?;
    Ok((assessment, estimate))
}

fn resolve_profiles(
    input: &AssessmentInput,
) -> Result<(AircraftProfile, PilotProfile), EngineError> {
    let aircraft = profile::resolve_aircraft(input.aircraft.as_deref())?;
    let pilot = profile::resolve_pilot(input.pilot.as_deref())?;
    Ok((aircraft, pilot))
}

/// Individually missing fields degrade into availability flags; the call only
/// aborts when the observation carries none of the core METAR fields.
fn validate(input: &AssessmentInput) -> Result<(), EngineError> {
    if input.runways.is_empty() {
        return Err(EngineError::NoRunway);
    }
    let obs = &input.observation;
    if obs.wind.is_none() && obs.temp_c.is_none() && obs.altimeter_in_hg.is_none() {
        return Err(EngineError::MissingInput {
            field: "wind/temperature/altimeter",
        });
    }
    Ok(())
}

fn assess_candidate(
    input: &AssessmentInput,
    runway: &RunwayCandidate,
    aircraft: &AircraftProfile,
    pilot: &PilotProfile,
) -> Result<RiskAssessment, EngineError> {
    let bundle = score::score_runway(&ScoreInput {
        obs: &input.observation,
        airfield: &input.airfield,
        runway,
        aircraft,
        notams: &input.notams,
        options: &input.options,
    })?;

    let multiplier = input
        .options
        .threshold_multiplier_override
        .unwrap_or(pilot.threshold_multiplier);

    Ok(aggregate(runway, bundle, multiplier, &input.options))
}

/// Turn a scorer bundle into the final verdict.
fn aggregate(
    runway: &RunwayCandidate,
    bundle: ScoreBundle,
    threshold_multiplier: f64,
    options: &AssessOptions,
) -> RiskAssessment {
    let ScoreBundle {
        mut factors,
        automatic_extreme,
        availability,
        headwind_kt,
        crosswind_kt,
        density_altitude_ft,
    } = bundle;

    let (score, category, status) = match automatic_extreme {
        Some(extreme) => {
            // The phenomena factor is dropped when it scored zero points;
            // the NO-GO reason still has to reach the caller.
            if !factors
                .iter()
                .any(|f| f.category == FactorCategory::Phenomena)
            {
                let mut f = RiskFactor::new(
                    FactorCategory::Phenomena,
                    0.0,
                    options.cap(FactorCategory::Phenomena),
                );
                f.reasons.push(extreme.reason().to_string());
                factors.push(f);
            }
            (100, RiskCategory::Extreme, OperationalStatus::NoGo)
        }
        None => {
            let total = factors.iter().map(|f| f.points).sum::<f64>();
            let score = total.round().clamp(0.0, 100.0) as u8;
            let (category, status) = classify(score, threshold_multiplier);
            (score, category, status)
        }
    };

    let mut ranked: Vec<&RiskFactor> = factors.iter().collect();
    ranked.sort_by(|a, b| b.points.total_cmp(&a.points));
    let primary_contributors = ranked
        .iter()
        .map(|f| f.category.as_str().to_string())
        .collect();

    RiskAssessment {
        runway: runway.ident.clone(),
        score,
        category,
        status,
        factors,
        diagnostics: Diagnostics {
            data_availability: availability,
            primary_contributors,
            headwind_kt,
            crosswind_kt,
            density_altitude_ft,
        },
    }
}

/// Band the score. The multiplier scales the boundaries, never the score:
/// conservative pilots (0.8) hit CAUTION and NO-GO earlier, aggressive
/// pilots (1.2) later.
pub(crate) fn classify(score: u8, threshold_multiplier: f64) -> (RiskCategory, OperationalStatus) {
    let s = score as f64;
    if s <= LOW_BOUNDARY * threshold_multiplier {
        (RiskCategory::Low, OperationalStatus::Go)
    } else if s <= MODERATE_BOUNDARY * threshold_multiplier {
        (RiskCategory::Moderate, OperationalStatus::Caution)
    } else if s <= HIGH_BOUNDARY * threshold_multiplier {
        (RiskCategory::High, OperationalStatus::Caution)
    } else {
        (RiskCategory::Extreme, OperationalStatus::NoGo)
    }
}
