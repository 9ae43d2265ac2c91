//! NOTAM scorer: keyword scan over raw notice text.
//!
//! The upstream fetcher occasionally hands back HTML error pages instead of
//! notices; those are filtered before any keyword can match.

use crate::assessment::{FactorCategory, RiskFactor};

const CONTAMINATION_POINTS: f64 = 20.0;
const CONSTRUCTION_POINTS: f64 = 15.0;
const NAV_OUTAGE_POINTS: f64 = 10.0;

const CONTAMINATION_KEYWORDS: &[&str] = &["SNOW", "ICE", "SLUSH", "WET", "CONTAMINATED"];
const CONSTRUCTION_KEYWORDS: &[&str] = &["CONSTRUCTION", "OBSTACLE", "WORK IN PROGRESS"];
const NAV_KEYWORDS: &[&str] = &["ILS", "PAPI", "VASI", "LIGHTS", "BEACON"];
const GARBAGE_MARKERS: &[&str] = &["<!DOCTYPE", "<HTML>", "INVALID QUERY", "ERROR", "<TITLE>"];

pub fn score(notams: &[String], cap: f64) -> RiskFactor {
    let mut points = 0.0;
    let mut reasons = Vec::new();

    let mut contamination = false;
    let mut construction = false;
    let mut nav_outage = false;

    for raw in notams {
        let text = raw.to_uppercase();
        if !looks_like_notam(&text) {
            continue;
        }
        contamination |= CONTAMINATION_KEYWORDS.iter().any(|k| text.contains(k));
        construction |= CONSTRUCTION_KEYWORDS.iter().any(|k| text.contains(k));
        nav_outage |= NAV_KEYWORDS.iter().any(|k| text.contains(k));
    }

    if contamination {
        points += CONTAMINATION_POINTS;
        reasons.push("Runway contamination reported in NOTAMs".to_string());
    }
    if construction {
        points += CONSTRUCTION_POINTS;
        reasons.push("Construction or obstacles reported".to_string());
    }
    if nav_outage {
        points += NAV_OUTAGE_POINTS;
        reasons.push("Navigation or lighting equipment outage".to_string());
    }

    let mut factor = RiskFactor::new(FactorCategory::Notam, points, cap);
    factor.reasons = reasons;
    factor
}

/// Reject HTML error pages and fragments too short to be a real notice.
fn looks_like_notam(text: &str) -> bool {
    if GARBAGE_MARKERS.iter().any(|m| text.contains(m)) {
        return false;
    }
    text.trim().len() >= 50 && text.contains("NOTAM")
}
