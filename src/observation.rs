//! Input data model: one immutable weather/runway snapshot per assessment.
//!
//! Everything here arrives already parsed from the upstream data-fetch layer
//! (METAR decoding, airport directory lookups, NOTAM retrieval are all
//! external collaborators). The engine only reads these values; it never
//! mutates or caches them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reported surface wind. Direction is degrees magnetic, speeds in knots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub direction_deg: f64,
    pub speed_kt: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gust_kt: Option<f64>,
}

/// Cloud coverage class from the METAR sky group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CloudCover {
    Few,
    Scattered,
    Broken,
    Overcast,
}

impl CloudCover {
    /// BKN and OVC layers constitute a ceiling.
    pub fn is_ceiling(self) -> bool {
        matches!(self, CloudCover::Broken | CloudCover::Overcast)
    }
}

/// One reported cloud layer (base in feet AGL).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudLayer {
    pub cover: CloudCover,
    pub base_ft: f64,
}

/// Three-hour barometric tendency, when the station reports one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureTendency {
    Rising,
    Steady,
    Falling,
    RapidlyFalling,
}

/// Point-in-time weather snapshot.
///
/// Optional fields reflect real METAR gaps; the scorers skip what is missing
/// and record the gap in `Diagnostics::data_availability`. Phenomena stay as
/// raw METAR tokens (`"TSRA"`, `"+SN"`, `"FZRA"`, `"LTG"`, ...) so the scorer
/// can match descriptor substrings the way the reports combine them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind: Option<Wind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility_sm: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cloud_layers: Vec<CloudLayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_c: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dewpoint_c: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altimeter_in_hg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure_tendency: Option<PressureTendency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wx_codes: Vec<String>,
    pub observed_at: DateTime<Utc>,
}

impl WeatherObservation {
    /// Lowest broken/overcast base, if any. This is the ceiling the
    /// phenomena scorer penalizes.
    pub fn ceiling_ft(&self) -> Option<f64> {
        self.cloud_layers
            .iter()
            .filter(|l| l.cover.is_ceiling())
            .map(|l| l.base_ft)
            .fold(None, |acc, b| {
                Some(match acc {
                    Some(a) if a <= b => a,
                    _ => b,
                })
            })
    }

    /// True when any phenomena token contains the given descriptor.
    pub fn has_wx(&self, code: &str) -> bool {
        self.wx_codes.iter().any(|c| c.contains(code))
    }
}

/// Static airfield context (elevation for density altitude, coordinates for
/// the solar scorer).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Airfield {
    pub elevation_ft: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// Runway surface contamination state, worst observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Contamination {
    #[default]
    Dry,
    Wet,
    StandingWater,
    Slush,
    Snow,
    Ice,
}

impl Contamination {
    /// Multiplier applied against published runway length; from landing
    /// distance factors for contaminated surfaces.
    pub fn length_multiplier(self) -> f64 {
        match self {
            Contamination::Dry => 1.0,
            Contamination::Wet => 1.15,
            Contamination::StandingWater => 1.4,
            Contamination::Slush => 1.6,
            Contamination::Snow => 1.8,
            Contamination::Ice => 2.2,
        }
    }
}

/// One runway under consideration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwayCandidate {
    pub ident: String,
    pub heading_deg: f64,
    /// Published length; `None` triggers a category-estimated fallback plus
    /// an explicit caveat in the rationale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_ft: Option<f64>,
    #[serde(default)]
    pub contamination: Contamination,
    /// Local terrain amplification of mechanical turbulence (1.0 = flat).
    #[serde(default = "default_terrain_factor")]
    pub terrain_factor: f64,
}

fn default_terrain_factor() -> f64 {
    1.0
}

impl RunwayCandidate {
    pub fn new(ident: impl Into<String>, heading_deg: f64) -> Self {
        Self {
            ident: ident.into(),
            heading_deg,
            length_ft: None,
            contamination: Contamination::Dry,
            terrain_factor: 1.0,
        }
    }

    pub fn with_length(mut self, length_ft: f64) -> Self {
        self.length_ft = Some(length_ft);
        self
    }

    pub fn with_contamination(mut self, c: Contamination) -> Self {
        self.contamination = c;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn obs_with_layers(layers: Vec<CloudLayer>) -> WeatherObservation {
        WeatherObservation {
            wind: None,
            visibility_sm: None,
            cloud_layers: layers,
            temp_c: None,
            dewpoint_c: None,
            altimeter_in_hg: None,
            pressure_tendency: None,
            wx_codes: vec![],
            observed_at: Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap(),
        }
    }

    #[test]
    fn ceiling_is_lowest_broken_or_overcast() {
        let obs = obs_with_layers(vec![
            CloudLayer {
                cover: CloudCover::Few,
                base_ft: 800.0,
            },
            CloudLayer {
                cover: CloudCover::Overcast,
                base_ft: 4500.0,
            },
            CloudLayer {
                cover: CloudCover::Broken,
                base_ft: 2500.0,
            },
        ]);
        assert_eq!(obs.ceiling_ft(), Some(2500.0));
    }

    #[test]
    fn few_and_scattered_never_form_a_ceiling() {
        let obs = obs_with_layers(vec![CloudLayer {
            cover: CloudCover::Scattered,
            base_ft: 1200.0,
        }]);
        assert_eq!(obs.ceiling_ft(), None);
    }

    #[test]
    fn wx_descriptor_matches_inside_combined_tokens() {
        let mut obs = obs_with_layers(vec![]);
        obs.wx_codes = vec!["+TSRA".into(), "BR".into()];
        assert!(obs.has_wx("TS"));
        assert!(obs.has_wx("RA"));
        assert!(!obs.has_wx("FZ"));
    }
}
