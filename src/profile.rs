//! Aircraft/pilot configuration resolver.
//!
//! Maps category/experience tokens onto a runway-length requirement, a
//! performance-degradation profile and a classification-threshold multiplier.
//! Resolution happens once at call entry; the scoring hot path only sees the
//! resolved structs. Unknown tokens fail fast; an omitted token falls back to
//! the documented generic defaults (light aircraft, standard profile).

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Aircraft performance class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AircraftCategory {
    /// Single-engine piston, < 12,500 lbs.
    Light,
    /// Twin-engine piston, < 12,500 lbs.
    LightTwin,
    Turboprop,
    /// Light jets, < 41,000 lbs.
    LightJet,
    /// > 41,000 lbs.
    Heavy,
}

impl AircraftCategory {
    /// Baseline runway length requirement in feet.
    pub fn runway_requirement_ft(self) -> f64 {
        match self {
            AircraftCategory::Light => 2000.0,
            AircraftCategory::LightTwin => 2500.0,
            AircraftCategory::Turboprop => 3000.0,
            AircraftCategory::LightJet => 3500.0,
            AircraftCategory::Heavy => 5000.0,
        }
    }
}

/// Density-altitude driven performance degradation curve:
/// factor = 1 + da_diff * da_per_ft + max(0, temp - isa) * per_deg_c_over_isa.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DegradationProfile {
    pub da_per_ft: f64,
    pub per_deg_c_over_isa: f64,
}

impl Default for DegradationProfile {
    fn default() -> Self {
        Self {
            da_per_ft: 0.0001,
            per_deg_c_over_isa: 0.005,
        }
    }
}

impl DegradationProfile {
    /// Multiplicative performance loss for the given conditions.
    pub fn factor(&self, da_diff_ft: f64, temp_dev_c: f64) -> f64 {
        1.0 + da_diff_ft.max(0.0) * self.da_per_ft + temp_dev_c.max(0.0) * self.per_deg_c_over_isa
    }
}

/// Resolved aircraft configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AircraftProfile {
    pub category: AircraftCategory,
    pub runway_requirement_ft: f64,
    pub degradation: DegradationProfile,
}

impl AircraftProfile {
    pub fn for_category(category: AircraftCategory) -> Self {
        Self {
            category,
            runway_requirement_ft: category.runway_requirement_ft(),
            degradation: DegradationProfile::default(),
        }
    }
}

impl Default for AircraftProfile {
    fn default() -> Self {
        Self::for_category(AircraftCategory::Light)
    }
}

/// Pilot experience band; drives how early the classifier escalates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PilotExperience {
    Conservative,
    Standard,
    Aggressive,
}

impl PilotExperience {
    /// Multiplier applied to the classification boundaries (never the raw
    /// score): conservative pilots reach CAUTION/NO-GO earlier.
    pub fn threshold_multiplier(self) -> f64 {
        match self {
            PilotExperience::Conservative => 0.8,
            PilotExperience::Standard => 1.0,
            PilotExperience::Aggressive => 1.2,
        }
    }
}

/// Resolved pilot configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PilotProfile {
    pub experience: PilotExperience,
    pub threshold_multiplier: f64,
}

impl PilotProfile {
    pub fn for_experience(experience: PilotExperience) -> Self {
        Self {
            experience,
            threshold_multiplier: experience.threshold_multiplier(),
        }
    }
}

impl Default for PilotProfile {
    fn default() -> Self {
        Self::for_experience(PilotExperience::Standard)
    }
}

/// Resolve an aircraft token (category name or a known type alias) into a
/// profile. `None` means the caller did not specify one and gets the generic
/// light-aircraft profile; an explicit but unknown token is an error.
pub fn resolve_aircraft(token: Option<&str>) -> Result<AircraftProfile, EngineError> {
    let Some(token) = token else {
        return Ok(AircraftProfile::default());
    };
    let category = match token.trim().to_ascii_lowercase().as_str() {
        "light" | "c172" | "c182" | "c210" | "pa28" => AircraftCategory::Light,
        "light_twin" | "pa34" | "be58" => AircraftCategory::LightTwin,
        "turboprop" | "tbm" | "pc12" | "king_air" => AircraftCategory::Turboprop,
        "light_jet" | "citation" => AircraftCategory::LightJet,
        "heavy" => AircraftCategory::Heavy,
        _ => {
            return Err(EngineError::Configuration {
                kind: "aircraft",
                token: token.to_string(),
            })
        }
    };
    Ok(AircraftProfile::for_category(category))
}

/// Resolve a pilot-experience token. Certificate-level aliases map onto the
/// three bands; `None` gets the standard profile.
pub fn resolve_pilot(token: Option<&str>) -> Result<PilotProfile, EngineError> {
    let Some(token) = token else {
        return Ok(PilotProfile::default());
    };
    let experience = match token.trim().to_ascii_lowercase().as_str() {
        "conservative" | "student" | "private" => PilotExperience::Conservative,
        "standard" | "instrument" | "commercial" | "cfi" => PilotExperience::Standard,
        "aggressive" | "atp" => PilotExperience::Aggressive,
        _ => {
            return Err(EngineError::Configuration {
                kind: "pilot",
                token: token.to_string(),
            })
        }
    };
    Ok(PilotProfile::for_experience(experience))
}
