//! Atmospheric scorer: density altitude, pressure trend, thermal gradient,
//! stability and temperature performance.
//!
//! Density altitude uses the standard rule-of-thumb chain:
//! pressure_alt = elev + (29.92 - altimeter) * 1000,
//! isa = 15 - 2 * elev / 1000, DA = PA + 120 * (temp - isa).
//! Inputs outside plausible bounds abort the call; the formulas are undefined
//! there.

use crate::assessment::{FactorCategory, RiskFactor};
use crate::error::EngineError;
use crate::observation::{Airfield, PressureTendency, WeatherObservation};
use chrono::Timelike;

/// Density-altitude excess scoring rate and sub-cap.
pub const DA_POINTS_PER_FT: f64 = 0.015;
pub const DA_SUBCAP: f64 = 30.0;

const THERMAL_SUBCAP: f64 = 20.0;
const STABILITY_SUBCAP: f64 = 30.0;
const TEMP_PERF_SUBCAP: f64 = 25.0;

/// Plausibility bounds shared with the Monte Carlo perturber.
pub const TEMP_MIN_C: f64 = -60.0;
pub const TEMP_MAX_C: f64 = 50.0;
pub const ALT_MIN_FT: f64 = -1000.0;
pub const ALT_MAX_FT: f64 = 20000.0;

/// Rough UTC-hour bucket driving the thermal heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeOfDay {
    EarlyMorning,
    Midday,
    Afternoon,
    Evening,
    LateEvening,
}

fn time_of_day(hour: u32) -> TimeOfDay {
    match hour {
        6..=9 => TimeOfDay::EarlyMorning,
        10..=13 => TimeOfDay::Midday,
        14..=17 => TimeOfDay::Afternoon,
        18..=21 => TimeOfDay::Evening,
        _ => TimeOfDay::LateEvening,
    }
}

pub fn pressure_altitude(field_elev_ft: f64, altimeter_in_hg: f64) -> f64 {
    field_elev_ft + (29.92 - altimeter_in_hg) * 1000.0
}

pub fn isa_temp_c(field_elev_ft: f64) -> f64 {
    15.0 - 2.0 * field_elev_ft / 1000.0
}

/// Density altitude in feet, range-checked. The computed value is clamped to
/// the plausibility band so downstream math stays defined even for extreme
/// but valid inputs.
pub fn density_altitude(
    field_elev_ft: f64,
    temp_c: f64,
    altimeter_in_hg: f64,
) -> Result<f64, EngineError> {
    if !(TEMP_MIN_C..=TEMP_MAX_C).contains(&temp_c) {
        return Err(EngineError::NumericRange {
            field: "temp_c",
            value: temp_c,
            min: TEMP_MIN_C,
            max: TEMP_MAX_C,
        });
    }
    if !(ALT_MIN_FT..=ALT_MAX_FT).contains(&field_elev_ft) {
        return Err(EngineError::NumericRange {
            field: "field_elevation_ft",
            value: field_elev_ft,
            min: ALT_MIN_FT,
            max: ALT_MAX_FT,
        });
    }
    let pa = pressure_altitude(field_elev_ft, altimeter_in_hg);
    let da = pa + 120.0 * (temp_c - isa_temp_c(field_elev_ft));
    Ok(da.clamp(ALT_MIN_FT, ALT_MAX_FT))
}

/// Atmosphere factor plus the resolved density-altitude numbers. Density
/// altitude is `None` when the observation carried no altimeter setting.
#[derive(Debug, Clone)]
pub struct AtmosphereScore {
    pub factor: RiskFactor,
    pub density_altitude_ft: Option<f64>,
    pub da_diff_ft: f64,
}

/// Score density altitude excess plus the trend/thermal/stability/temperature
/// sub-scores for one observation. The temperature-driven sub-scores run even
/// without an altimeter setting; only the density-altitude part needs it.
pub fn score(
    obs: &WeatherObservation,
    airfield: &Airfield,
    temp_c: f64,
    altimeter_in_hg: Option<f64>,
    cap: f64,
) -> Result<AtmosphereScore, EngineError> {
    if !(TEMP_MIN_C..=TEMP_MAX_C).contains(&temp_c) {
        return Err(EngineError::NumericRange {
            field: "temp_c",
            value: temp_c,
            min: TEMP_MIN_C,
            max: TEMP_MAX_C,
        });
    }

    let mut points = 0.0;
    let mut reasons = Vec::new();

    let (density_altitude_ft, da_diff) = match altimeter_in_hg {
        Some(altim) => {
            let da = density_altitude(airfield.elevation_ft, temp_c, altim)?;
            let da_diff = da - airfield.elevation_ft;
            if da_diff > 0.0 {
                let p = (da_diff * DA_POINTS_PER_FT).min(DA_SUBCAP);
                if p > 0.0 {
                    points += p;
                    reasons.push(format!(
                        "Density altitude {:.0} ft, {:.0} ft above field elevation",
                        da, da_diff
                    ));
                }
            }
            (Some(da), da_diff)
        }
        None => (None, 0.0),
    };

    let (trend, mut trend_reasons) = pressure_trend(obs.pressure_tendency);
    points += trend;
    reasons.append(&mut trend_reasons);

    let tod = time_of_day(obs.observed_at.hour());
    let (thermal, mut thermal_reasons) = thermal_gradient(temp_c, obs.dewpoint_c, tod);
    points += thermal;
    reasons.append(&mut thermal_reasons);

    let wind_speed = obs.wind.map(|w| w.speed_kt).unwrap_or(0.0);
    let (stability, mut stability_reasons) = stability_index(temp_c, obs.dewpoint_c, wind_speed);
    points += stability;
    reasons.append(&mut stability_reasons);

    let (temp_perf, mut temp_reasons) = temperature_performance(temp_c, da_diff);
    points += temp_perf;
    reasons.append(&mut temp_reasons);

    let mut factor = RiskFactor::new(FactorCategory::Atmosphere, points, cap);
    factor.reasons = reasons;
    Ok(AtmosphereScore {
        factor,
        density_altitude_ft,
        da_diff_ft: da_diff,
    })
}

/// Falling pressure ahead of the observation is the classic precursor of a
/// deteriorating trend.
fn pressure_trend(tendency: Option<PressureTendency>) -> (f64, Vec<String>) {
    match tendency {
        Some(PressureTendency::RapidlyFalling) => (
            15.0,
            vec!["Rapidly falling pressure, weather system approaching".to_string()],
        ),
        Some(PressureTendency::Falling) => (
            8.0,
            vec!["Falling pressure suggests deteriorating conditions".to_string()],
        ),
        _ => (0.0, Vec::new()),
    }
}

/// Strong surface heating with a dry spread breeds thermals; a cold, moist
/// boundary layer at the day's edges hints at an inversion.
fn thermal_gradient(temp_c: f64, dewpoint_c: Option<f64>, tod: TimeOfDay) -> (f64, Vec<String>) {
    let Some(dewpoint) = dewpoint_c else {
        return (0.0, Vec::new());
    };
    let spread = temp_c - dewpoint;
    let mut score = 0.0_f64;
    let mut reasons = Vec::new();

    if temp_c > 25.0
        && spread > 10.0
        && matches!(tod, TimeOfDay::Midday | TimeOfDay::Afternoon)
    {
        score += 15.0;
        reasons.push(format!(
            "Strong thermal activity expected ({temp_c:.0}\u{b0}C, spread {spread:.0}\u{b0}C)"
        ));
    }
    if temp_c < 5.0
        && spread < 3.0
        && matches!(tod, TimeOfDay::EarlyMorning | TimeOfDay::LateEvening)
    {
        score += 10.0;
        reasons.push("Temperature inversion conditions may cause low-level turbulence".to_string());
    }

    (score.min(THERMAL_SUBCAP), reasons)
}

/// Convective potential (warm + tight spread) and mechanical turbulence
/// (strong wind over a dry airmass).
fn stability_index(temp_c: f64, dewpoint_c: Option<f64>, wind_speed_kt: f64) -> (f64, Vec<String>) {
    let Some(dewpoint) = dewpoint_c else {
        return (0.0, Vec::new());
    };
    let spread = temp_c - dewpoint;
    let mut score = 0.0;
    let mut reasons = Vec::new();

    if temp_c > 20.0 && spread < 5.0 {
        let convective = ((30.0 - temp_c + (5.0 - spread)) * 2.0).clamp(0.0, 25.0);
        if convective > 0.0 {
            score += convective;
            reasons.push("High convective potential, thunderstorm development possible".to_string());
        }
    }
    if wind_speed_kt > 20.0 && spread > 15.0 {
        score += 10.0;
        reasons.push("Mechanical turbulence likely with strong winds over dry airmass".to_string());
    }

    (score.min(STABILITY_SUBCAP), reasons)
}

/// Extreme heat or cold degrades engine and systems performance.
fn temperature_performance(temp_c: f64, da_diff_ft: f64) -> (f64, Vec<String>) {
    let mut score = 0.0_f64;
    let mut reasons = Vec::new();

    if temp_c > 35.0 {
        score += 15.0;
        reasons.push(format!("High temperature ({temp_c:.0}\u{b0}C) reduces engine performance"));
    } else if temp_c > 30.0 {
        score += 10.0;
        reasons.push(format!("Elevated temperature ({temp_c:.0}\u{b0}C) affects performance"));
    }

    if temp_c < -20.0 {
        score += 15.0;
        reasons.push(format!(
            "Very cold temperature ({temp_c:.0}\u{b0}C) affects systems and performance"
        ));
    } else if temp_c < -10.0 {
        score += 10.0;
        reasons.push(format!("Cold temperature ({temp_c:.0}\u{b0}C) may affect systems"));
    }

    if temp_c > 30.0 && da_diff_ft > 1000.0 {
        score += 10.0;
        reasons.push("High temperature combined with elevated density altitude".to_string());
    }

    (score.min(TEMP_PERF_SUBCAP), reasons)
}
