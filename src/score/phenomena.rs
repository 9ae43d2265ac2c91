//! Weather-phenomena scorer: reported wx codes, precipitation intensity,
//! icing, wind shear, turbulence, and the ceiling/visibility penalties.
//!
//! Three phenomena are not scored at all: thunderstorm, funnel cloud and
//! volcanic ash set an automatic-extreme flag that the aggregator turns into
//! score 100 / NO-GO regardless of everything else.

use crate::assessment::{FactorCategory, RiskFactor};
use crate::observation::WeatherObservation;

const ICING_SUBCAP: f64 = 30.0;
const WIND_SHEAR_SUBCAP: f64 = 25.0;
const TURBULENCE_SUBCAP: f64 = 25.0;
const PRECIP_SUBCAP: f64 = 50.0;

/// Phenomena that force score 100 / NO-GO on sight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremePhenomenon {
    Thunderstorm,
    FunnelCloud,
    VolcanicAsh,
}

impl ExtremePhenomenon {
    pub fn reason(self) -> &'static str {
        match self {
            ExtremePhenomenon::Thunderstorm => "Active thunderstorm reported, NO-GO condition",
            ExtremePhenomenon::FunnelCloud => "Funnel cloud reported, NO-GO condition",
            ExtremePhenomenon::VolcanicAsh => "Volcanic ash reported, NO-GO condition",
        }
    }
}

/// Result of the phenomena scorer. The icing/ceiling split feeds the
/// correlation amplifier.
#[derive(Debug, Clone)]
pub struct PhenomenaScore {
    pub factor: RiskFactor,
    pub icing_points: f64,
    pub ceiling_points: f64,
    pub automatic_extreme: Option<ExtremePhenomenon>,
}

/// Score all weather phenomena for one observation.
pub fn score(obs: &WeatherObservation, terrain_factor: f64, cap: f64) -> PhenomenaScore {
    let mut points = 0.0;
    let mut reasons = Vec::new();

    let automatic_extreme = detect_extreme(obs);
    if let Some(extreme) = automatic_extreme {
        reasons.push(extreme.reason().to_string());
    }

    // Flat adders for significant wx codes.
    for (code, pts, reason) in [
        ("LTG", 25.0, "Lightning observed in vicinity"),
        ("GR", 40.0, "Hail reported"),
        ("FZ", 30.0, "Freezing precipitation reported"),
        ("FG", 15.0, "Fog conditions reduce visibility"),
        ("SQ", 30.0, "Squall line activity"),
    ] {
        if obs.has_wx(code) {
            points += pts;
            reasons.push(reason.to_string());
        }
    }
    if obs.has_wx("BR") || obs.has_wx("HZ") {
        points += 5.0;
        reasons.push("Mist or haze reducing visibility".to_string());
    }
    if obs.has_wx("DU") || obs.has_wx("SA") || obs.has_wx("DS") {
        points += 20.0;
        reasons.push("Blowing dust or sand affecting visibility".to_string());
    }
    if obs.wx_codes.iter().any(|c| c.starts_with('+')) {
        points += 20.0;
        reasons.push("Heavy precipitation reported".to_string());
    }

    let (precip, mut precip_reasons) = precipitation_intensity(&obs.wx_codes);
    points += precip;
    reasons.append(&mut precip_reasons);

    let (icing_points, mut icing_reasons) = icing(obs);
    points += icing_points;
    reasons.append(&mut icing_reasons);

    let (shear, mut shear_reasons) = wind_shear(obs);
    points += shear;
    reasons.append(&mut shear_reasons);

    let (turb, mut turb_reasons) = turbulence(obs, terrain_factor);
    points += turb;
    reasons.append(&mut turb_reasons);

    let ceiling_points = match obs.ceiling_ft() {
        Some(c) => {
            let p = ceiling_penalty(c);
            if p > 0.0 {
                reasons.push(format!("Low ceiling {:.0} ft AGL", c));
            }
            p
        }
        None => 0.0,
    };
    points += ceiling_points;

    if let Some(vis) = obs.visibility_sm {
        let p = visibility_penalty(vis);
        if p > 0.0 {
            points += p;
            reasons.push(format!("Reduced visibility {:.1} SM", vis));
        }
    }

    let mut factor = RiskFactor::new(FactorCategory::Phenomena, points, cap);
    factor.reasons = reasons;
    PhenomenaScore {
        factor,
        icing_points,
        ceiling_points,
        automatic_extreme,
    }
}

fn detect_extreme(obs: &WeatherObservation) -> Option<ExtremePhenomenon> {
    // VCTS and TSRA both contain TS; any mention means convective activity
    // close enough to matter.
    if obs.has_wx("TS") {
        Some(ExtremePhenomenon::Thunderstorm)
    } else if obs.has_wx("FC") {
        Some(ExtremePhenomenon::FunnelCloud)
    } else if obs.has_wx("VA") {
        Some(ExtremePhenomenon::VolcanicAsh)
    } else {
        None
    }
}

/// Three-tier precipitation table; the heaviest matching tier wins per token.
fn precipitation_intensity(wx_codes: &[String]) -> (f64, Vec<String>) {
    const HEAVY: &[(&str, f64, &str)] = &[
        ("+TSRA", 35.0, "Heavy thunderstorm rain"),
        ("+FZRA", 40.0, "Heavy freezing rain"),
        ("+RA", 20.0, "Heavy rain"),
        ("+SN", 25.0, "Heavy snow"),
        ("+PL", 30.0, "Heavy ice pellets"),
        ("+GR", 50.0, "Heavy hail"),
    ];
    const LIGHT: &[(&str, f64, &str)] = &[
        ("-FZRA", 15.0, "Light freezing rain"),
        ("-RA", 3.0, "Light rain"),
        ("-SN", 5.0, "Light snow"),
    ];
    const MODERATE: &[(&str, f64, &str)] = &[
        ("TSRA", 18.0, "Thunderstorm rain"),
        ("FZRA", 25.0, "Freezing rain"),
        ("RA", 8.0, "Rain"),
        ("SN", 12.0, "Snow"),
        ("PL", 15.0, "Ice pellets"),
    ];

    let mut score = 0.0;
    let mut reasons = Vec::new();
    for token in wx_codes {
        let tier = HEAVY
            .iter()
            .find(|(code, _, _)| token.contains(code))
            .or_else(|| LIGHT.iter().find(|(code, _, _)| token.contains(code)))
            .or_else(|| MODERATE.iter().find(|(code, _, _)| token.contains(code)));
        if let Some((_, pts, desc)) = tier {
            score += pts;
            reasons.push(format!("{desc} affects visibility and runway conditions"));
        }
    }
    (score.min(PRECIP_SUBCAP), reasons)
}

/// Icing risk from temperature band, cloud presence and humidity.
fn icing(obs: &WeatherObservation) -> (f64, Vec<String>) {
    let mut score = 0.0_f64;
    let mut reasons = Vec::new();

    if obs.has_wx("FZ") {
        score += 30.0;
        reasons.push("Freezing precipitation is an immediate icing hazard".to_string());
    }

    let has_cloud_deck = obs.cloud_layers.iter().any(|l| l.cover.is_ceiling());
    if let Some(temp) = obs.temp_c {
        if (-10.0..=2.0).contains(&temp) && has_cloud_deck {
            if temp >= 0.0 {
                score += 25.0;
                reasons.push("Prime icing conditions (0\u{b0}C to +2\u{b0}C with clouds)".to_string());
            } else {
                score += 20.0;
                reasons.push("Icing conditions possible (-10\u{b0}C to 0\u{b0}C with clouds)".to_string());
            }
        }
        if let Some(dew) = obs.dewpoint_c {
            let spread = temp - dew;
            if spread <= 3.0 && (-5.0..=5.0).contains(&temp) && has_cloud_deck {
                score += 15.0;
                reasons.push(format!(
                    "High humidity (spread {spread:.0}\u{b0}C) with clouds in icing range"
                ));
            }
        }
    }

    if obs.has_wx("IC") || obs.has_wx("PL") {
        score += 20.0;
        reasons.push("Ice pellets reported".to_string());
    }

    (score.min(ICING_SUBCAP), reasons)
}

fn wind_shear(obs: &WeatherObservation) -> (f64, Vec<String>) {
    let mut score = 0.0_f64;
    let mut reasons = Vec::new();
    if obs.has_wx("TS") {
        score += 25.0;
        reasons.push("Thunderstorm wind shear risk".to_string());
    }
    if obs.has_wx("SH") {
        score += 15.0;
        reasons.push("Shower activity indicates possible wind shear".to_string());
    }
    (score.min(WIND_SHEAR_SUBCAP), reasons)
}

/// Gust-to-steady ratio plus absolute wind strength, amplified by terrain.
fn turbulence(obs: &WeatherObservation, terrain_factor: f64) -> (f64, Vec<String>) {
    let Some(wind) = obs.wind else {
        return (0.0, Vec::new());
    };
    let mut score = 0.0;
    let mut reasons = Vec::new();

    if let Some(gust) = wind.gust_kt {
        if gust > 0.0 {
            let ratio = gust / wind.speed_kt.max(1.0);
            if ratio > 2.0 {
                score += 20.0;
                reasons.push(format!(
                    "Severe gustiness: {:.0} kt gusts vs {:.0} kt steady",
                    gust, wind.speed_kt
                ));
            } else if ratio > 1.5 {
                score += 15.0;
                reasons.push(format!(
                    "Significant gustiness: {:.0} kt gusts vs {:.0} kt steady",
                    gust, wind.speed_kt
                ));
            } else if ratio > 1.3 {
                score += 10.0;
                reasons.push(format!(
                    "Moderate gustiness: {:.0} kt gusts vs {:.0} kt steady",
                    gust, wind.speed_kt
                ));
            }
        }
    }

    if wind.speed_kt > 25.0 {
        score += 15.0;
        reasons.push(format!("Strong winds ({:.0} kt) likely causing turbulence", wind.speed_kt));
    } else if wind.speed_kt > 20.0 {
        score += 10.0;
        reasons.push(format!("Fresh winds ({:.0} kt) may cause turbulence", wind.speed_kt));
    }

    if terrain_factor > 1.0 {
        score += (terrain_factor - 1.0) * 20.0;
        reasons.push("Terrain features may enhance turbulence".to_string());
    }

    (score.min(TURBULENCE_SUBCAP), reasons)
}

/// Stepped ceiling penalty; the lowest qualifying band applies once.
fn ceiling_penalty(ceiling_ft: f64) -> f64 {
    if ceiling_ft < 500.0 {
        40.0
    } else if ceiling_ft < 1000.0 {
        30.0
    } else if ceiling_ft < 2000.0 {
        20.0
    } else if ceiling_ft < 3000.0 {
        10.0
    } else {
        0.0
    }
}

/// Stepped visibility penalty, same single-band rule.
fn visibility_penalty(visibility_sm: f64) -> f64 {
    if visibility_sm < 1.0 {
        40.0
    } else if visibility_sm < 2.0 {
        30.0
    } else if visibility_sm < 3.0 {
        20.0
    } else if visibility_sm < 5.0 {
        10.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::{CloudCover, CloudLayer, Wind};
    use chrono::{TimeZone, Utc};

    const CAP: f64 = 100.0;

    fn obs() -> WeatherObservation {
        WeatherObservation {
            wind: None,
            visibility_sm: None,
            cloud_layers: vec![],
            temp_c: None,
            dewpoint_c: None,
            altimeter_in_hg: None,
            pressure_tendency: None,
            wx_codes: vec![],
            observed_at: Utc.with_ymd_and_hms(2025, 1, 20, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn thunderstorm_sets_the_extreme_flag() {
        let mut o = obs();
        o.wx_codes = vec!["TSRA".into()];
        let s = score(&o, 1.0, CAP);
        assert_eq!(s.automatic_extreme, Some(ExtremePhenomenon::Thunderstorm));
    }

    #[test]
    fn funnel_cloud_and_ash_are_extreme_too() {
        let mut o = obs();
        o.wx_codes = vec!["FC".into()];
        assert_eq!(score(&o, 1.0, CAP).automatic_extreme, Some(ExtremePhenomenon::FunnelCloud));
        o.wx_codes = vec!["VA".into()];
        assert_eq!(score(&o, 1.0, CAP).automatic_extreme, Some(ExtremePhenomenon::VolcanicAsh));
    }

    #[test]
    fn clear_calm_observation_scores_nothing() {
        let s = score(&obs(), 1.0, CAP);
        assert_eq!(s.factor.points, 0.0);
        assert!(s.automatic_extreme.is_none());
    }

    #[test]
    fn ceiling_bands_apply_lowest_once() {
        assert_eq!(ceiling_penalty(400.0), 40.0);
        assert_eq!(ceiling_penalty(500.0), 30.0);
        assert_eq!(ceiling_penalty(1999.0), 20.0);
        assert_eq!(ceiling_penalty(2999.0), 10.0);
        assert_eq!(ceiling_penalty(3000.0), 0.0);
    }

    #[test]
    fn visibility_bands_apply_lowest_once() {
        assert_eq!(visibility_penalty(0.5), 40.0);
        assert_eq!(visibility_penalty(1.5), 30.0);
        assert_eq!(visibility_penalty(2.5), 20.0);
        assert_eq!(visibility_penalty(4.0), 10.0);
        assert_eq!(visibility_penalty(6.0), 0.0);
    }

    #[test]
    fn prime_icing_band_needs_a_cloud_deck() {
        let mut o = obs();
        o.temp_c = Some(1.0);
        let (pts, _) = icing(&o);
        assert_eq!(pts, 0.0);

        o.cloud_layers = vec![CloudLayer {
            cover: CloudCover::Overcast,
            base_ft: 1800.0,
        }];
        let (pts, reasons) = icing(&o);
        assert_eq!(pts, 25.0);
        assert!(reasons[0].contains("Prime icing"));
    }

    #[test]
    fn freezing_precip_saturates_the_icing_subcap() {
        let mut o = obs();
        o.temp_c = Some(0.5);
        o.wx_codes = vec!["FZRA".into()];
        o.cloud_layers = vec![CloudLayer {
            cover: CloudCover::Broken,
            base_ft: 900.0,
        }];
        let (pts, _) = icing(&o);
        assert_eq!(pts, ICING_SUBCAP);
    }

    #[test]
    fn thunderstorm_with_showers_saturates_the_shear_subcap() {
        let mut o = obs();
        o.wx_codes = vec!["TSRA".into(), "SHRA".into()];
        let (pts, _) = wind_shear(&o);
        assert_eq!(pts, WIND_SHEAR_SUBCAP);
    }

    #[test]
    fn severe_gust_ratio_scores_twenty() {
        let mut o = obs();
        o.wind = Some(Wind {
            direction_deg: 180.0,
            speed_kt: 8.0,
            gust_kt: Some(18.0),
        });
        let (pts, _) = turbulence(&o, 1.0);
        assert_eq!(pts, 20.0);
    }

    #[test]
    fn terrain_factor_amplifies_turbulence() {
        let mut o = obs();
        o.wind = Some(Wind {
            direction_deg: 180.0,
            speed_kt: 22.0,
            gust_kt: None,
        });
        let (flat, _) = turbulence(&o, 1.0);
        let (rough, _) = turbulence(&o, 1.5);
        assert_eq!(flat, 10.0);
        assert_eq!(rough, 20.0);
    }

    #[test]
    fn heavy_freezing_rain_hits_precip_table_once() {
        let (pts, reasons) = precipitation_intensity(&["+FZRA".to_string()]);
        assert_eq!(pts, 40.0);
        assert_eq!(reasons.len(), 1);
    }

    #[test]
    fn precip_table_caps_at_fifty() {
        let (pts, _) =
            precipitation_intensity(&["+GR".to_string(), "+FZRA".to_string(), "SN".to_string()]);
        assert_eq!(pts, PRECIP_SUBCAP);
    }
}
