//! Typed errors for the assessment pipeline.
//!
//! Policy (see `engine`): individually missing fields degrade gracefully and
//! only show up in `Diagnostics::data_availability`; these variants cover the
//! cases where continuing would be meaningless or unsafe.

/// Errors that can abort an `assess` call.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Both wind and the core METAR fields are absent; there is nothing to score.
    #[error("required input missing: {field}")]
    MissingInput { field: &'static str },

    /// Unknown aircraft or pilot token. Never silently substituted.
    #[error("unrecognized {kind} token: {token:?}")]
    Configuration { kind: &'static str, token: String },

    /// A numeric input is outside physically plausible bounds; the downstream
    /// atmosphere formulas are undefined there.
    #[error("{field} = {value} outside plausible range [{min}, {max}]")]
    NumericRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// No runway candidate could be scored (empty list or all invalid).
    #[error("no usable runway candidate")]
    NoRunway,
}
