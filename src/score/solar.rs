//! Temporal scorer: solar position, day/twilight/night and runway glare.
//!
//! Sun position uses the NOAA low-accuracy series (equation of time +
//! declination as Fourier terms of the year fraction); good to a fraction of
//! a degree, which is plenty for glare banding. Glare only matters when the
//! sun sits low over the runway axis: alignment within 15 degrees (ahead or
//! behind) with elevation at or below 20 degrees is the critical case.

use crate::assessment::{FactorCategory, RiskFactor};
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::f64::consts::PI;

const NIGHT_POINTS: f64 = 20.0;
const TWILIGHT_POINTS: f64 = 15.0;
const CRITICAL_GLARE_POINTS: f64 = 25.0;
const MODERATE_GLARE_POINTS: f64 = 15.0;

/// Lighting period derived from solar zenith angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePeriod {
    Day,
    Twilight,
    Night,
}

/// Solar zenith and compass azimuth (degrees, azimuth clockwise from north).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    pub zenith_deg: f64,
    pub azimuth_deg: f64,
}

impl SunPosition {
    pub fn elevation_deg(&self) -> f64 {
        90.0 - self.zenith_deg
    }
}

/// NOAA solar position for a UTC timestamp and location.
pub fn sun_position(when: DateTime<Utc>, lat: f64, lon: f64) -> SunPosition {
    let day_of_year = when.ordinal() as f64;
    let hour =
        when.hour() as f64 + when.minute() as f64 / 60.0 + when.second() as f64 / 3600.0;

    let gamma = 2.0 * PI * (day_of_year - 1.0) / 365.0;
    let eqtime = 229.18
        * (0.000075 + 0.001868 * gamma.cos()
            - 0.032077 * gamma.sin()
            - 0.014615 * (2.0 * gamma).cos()
            - 0.040849 * (2.0 * gamma).sin());
    let decl = 0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin()
        - 0.006758 * (2.0 * gamma).cos()
        + 0.000907 * (2.0 * gamma).sin()
        - 0.002697 * (3.0 * gamma).cos()
        + 0.00148 * (3.0 * gamma).sin();

    let time_offset = eqtime + 4.0 * lon;
    let solar_time = (hour * 60.0 + time_offset) / 60.0;
    // Wrap into (-180, 180] so pre/post-midnight UTC times stay sane.
    let mut hour_angle = ((solar_time - 12.0) * 15.0).rem_euclid(360.0);
    if hour_angle > 180.0 {
        hour_angle -= 360.0;
    }

    let ha_rad = hour_angle.to_radians();
    let lat_rad = lat.to_radians();

    let cos_zenith =
        lat_rad.sin() * decl.sin() + lat_rad.cos() * decl.cos() * ha_rad.cos();
    let zenith = cos_zenith.clamp(-1.0, 1.0).acos();

    let sin_zenith = zenith.sin();
    let azimuth = if sin_zenith.abs() < 1e-9 {
        0.0
    } else {
        let cos_az =
            ((lat_rad.sin() * zenith.cos()) - decl.sin()) / (lat_rad.cos() * sin_zenith);
        let az = cos_az.clamp(-1.0, 1.0).acos();
        if hour_angle > 0.0 {
            2.0 * PI - az
        } else {
            az
        }
    };

    SunPosition {
        zenith_deg: zenith.to_degrees(),
        azimuth_deg: azimuth.to_degrees(),
    }
}

/// Classify the lighting period. Zenith past 90 means the sun is below the
/// horizon; the 80..90 band covers the low-sun transition.
pub fn time_period(sun: &SunPosition) -> TimePeriod {
    if sun.zenith_deg >= 90.0 {
        TimePeriod::Night
    } else if sun.zenith_deg > 80.0 {
        TimePeriod::Twilight
    } else {
        TimePeriod::Day
    }
}

/// Score temporal risk for one runway heading.
pub fn score(when: DateTime<Utc>, lat: f64, lon: f64, runway_heading_deg: f64, cap: f64) -> RiskFactor {
    let sun = sun_position(when, lat, lon);
    let period = time_period(&sun);

    let mut points = 0.0;
    let mut reasons = Vec::new();

    match period {
        TimePeriod::Night => {
            points += NIGHT_POINTS;
            reasons.push("Night operations".to_string());
        }
        TimePeriod::Twilight => {
            points += TWILIGHT_POINTS;
            reasons.push("Twilight conditions, reduced visibility and depth perception".to_string());
        }
        TimePeriod::Day => {}
    }

    if period != TimePeriod::Night {
        let elevation = sun.elevation_deg();
        let diff = runway_alignment_deg(sun.azimuth_deg, runway_heading_deg);
        let aligned_tight = diff <= 15.0 || diff >= 165.0;
        let aligned_loose = diff <= 30.0 || diff >= 150.0;

        if elevation > 0.0 && elevation <= 20.0 && aligned_tight {
            points += CRITICAL_GLARE_POINTS;
            reasons.push("Critical sun glare, sun low and directly ahead or behind".to_string());
        } else if elevation > 0.0 && elevation <= 30.0 && aligned_loose {
            points += MODERATE_GLARE_POINTS;
            reasons.push("Moderate sun glare near the runway axis".to_string());
        }
    }

    let mut factor = RiskFactor::new(FactorCategory::Temporal, points, cap);
    factor.reasons = reasons;
    factor
}

/// Smallest angle between sun azimuth and runway heading, 0..=180.
fn runway_alignment_deg(azimuth_deg: f64, heading_deg: f64) -> f64 {
    let d = (azimuth_deg - heading_deg).rem_euclid(360.0);
    d.min(360.0 - d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const CAP: f64 = 30.0;
    // Central Oklahoma: solar noon near 18:30Z in summer.
    const LAT: f64 = 35.4;
    const LON: f64 = -97.6;

    #[test]
    fn midday_summer_sun_is_high_and_south() {
        let when = Utc.with_ymd_and_hms(2025, 6, 21, 18, 30, 0).unwrap();
        let sun = sun_position(when, LAT, LON);
        assert!(sun.elevation_deg() > 70.0, "elevation {}", sun.elevation_deg());
        assert_eq!(time_period(&sun), TimePeriod::Day);
    }

    #[test]
    fn local_midnight_is_night() {
        let when = Utc.with_ymd_and_hms(2025, 6, 21, 7, 0, 0).unwrap();
        let sun = sun_position(when, LAT, LON);
        assert_eq!(time_period(&sun), TimePeriod::Night);
    }

    #[test]
    fn night_scores_twenty_and_no_glare() {
        let when = Utc.with_ymd_and_hms(2025, 6, 21, 7, 0, 0).unwrap();
        let f = score(when, LAT, LON, 270.0, CAP);
        assert_eq!(f.points, 20.0);
        assert_eq!(f.reasons, vec!["Night operations".to_string()]);
    }

    #[test]
    fn high_sun_at_midday_produces_no_glare() {
        let when = Utc.with_ymd_and_hms(2025, 6, 21, 18, 30, 0).unwrap();
        // Even a south-facing runway is safe with the sun 75 degrees up.
        let f = score(when, LAT, LON, 180.0, CAP);
        assert_eq!(f.points, 0.0);
    }

    #[test]
    fn low_western_sun_glares_a_west_facing_runway() {
        // About an hour before sunset the sun sits low in the west.
        let when = Utc.with_ymd_and_hms(2025, 6, 21, 0, 30, 0).unwrap();
        let sun = sun_position(when, LAT, LON);
        assert!(sun.elevation_deg() > 0.0 && sun.elevation_deg() <= 20.0);
        assert!(sun.azimuth_deg > 240.0 && sun.azimuth_deg < 310.0);

        let aligned = score(when, LAT, LON, sun.azimuth_deg, CAP);
        assert!(aligned.points >= CRITICAL_GLARE_POINTS);

        // A crosswise runway sees no glare at the same moment.
        let crosswise = score(when, LAT, LON, sun.azimuth_deg + 90.0, CAP);
        assert!(crosswise.points < CRITICAL_GLARE_POINTS);
    }

    #[test]
    fn alignment_wraps_and_counts_the_reciprocal() {
        assert_eq!(runway_alignment_deg(10.0, 350.0), 20.0);
        assert_eq!(runway_alignment_deg(270.0, 90.0), 180.0);
        assert_eq!(runway_alignment_deg(5.0, 185.0), 180.0);
    }
}
