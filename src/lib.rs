// src/lib.rs
// Public library surface for integration tests (and embedding callers).

pub mod assessment;
pub mod engine;
pub mod error;
pub mod montecarlo;
pub mod observation;
pub mod options;
pub mod profile;
pub mod score;
pub mod stats;

// ---- Re-exports for stable public API ----
pub use crate::assessment::{
    Diagnostics, FactorCategory, OperationalStatus, RiskAssessment, RiskCategory, RiskFactor,
};
pub use crate::engine::{assess, assess_runway, assess_with_uncertainty, AssessmentInput};
pub use crate::error::EngineError;
pub use crate::observation::{
    Airfield, CloudCover, CloudLayer, Contamination, PressureTendency, RunwayCandidate,
    WeatherObservation, Wind,
};
pub use crate::options::{AmplificationRules, AssessOptions, UncertaintyOptions};
pub use crate::profile::{
    resolve_aircraft, resolve_pilot, AircraftCategory, AircraftProfile, PilotExperience,
    PilotProfile,
};
pub use crate::stats::{SensitivityEntry, TemporalPoint, UncertaintyEstimate};
