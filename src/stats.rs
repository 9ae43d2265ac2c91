//! Statistical post-processing for the Monte Carlo estimator: percentile
//! ladder, distribution shape, confidence bands and the category histogram.

use crate::assessment::{OperationalStatus, RiskCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Percentiles reported on every estimate.
const PERCENTILE_LADDER: &[(&str, f64)] = &[
    ("p01", 1.0),
    ("p05", 5.0),
    ("p10", 10.0),
    ("p25", 25.0),
    ("p50", 50.0),
    ("p75", 75.0),
    ("p90", 90.0),
    ("p95", 95.0),
    ("p99", 99.0),
];

/// Central moments and spread of the sampled score distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionShape {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub variance: f64,
    /// Third standardized moment; positive means a heavy right tail.
    pub skewness: f64,
    /// Excess kurtosis (normal = 0).
    pub kurtosis: f64,
    pub iqr: f64,
    pub min: f64,
    pub max: f64,
}

/// Central interval at a given coverage level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

/// The three reported central bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBands {
    /// p25..p75
    pub ci50: ConfidenceInterval,
    /// p10..p90
    pub ci80: ConfidenceInterval,
    /// p05..p95
    pub ci90: ConfidenceInterval,
}

/// One-at-a-time input sensitivity: how far the deterministic score moves
/// when a single input is nudged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityEntry {
    pub parameter: String,
    /// Score delta against the unperturbed baseline.
    pub delta: f64,
}

/// Projected score for a future hour under the diurnal temperature model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalPoint {
    pub hours_ahead: u32,
    pub mean_score: f64,
    /// Forecast confidence decays with lead time, floored at 0.3.
    pub confidence: f64,
}

/// Complete Monte Carlo uncertainty estimate for one runway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyEstimate {
    pub iterations: usize,
    pub seed: u64,
    pub percentiles: BTreeMap<String, f64>,
    pub shape: DistributionShape,
    pub confidence: ConfidenceBands,
    /// Sample count per risk category.
    pub category_counts: BTreeMap<String, usize>,
    /// Trial count per scenario cluster drawn.
    pub scenario_clusters: BTreeMap<String, usize>,
    /// Fraction of samples classified NO-GO.
    pub no_go_probability: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sensitivity: Vec<SensitivityEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub temporal: Vec<TemporalPoint>,
}

/// Linear-interpolated percentile over a pre-sorted sample.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// The full percentile ladder.
pub fn percentile_ladder(sorted: &[f64]) -> BTreeMap<String, f64> {
    PERCENTILE_LADDER
        .iter()
        .map(|(name, p)| (name.to_string(), percentile(sorted, *p)))
        .collect()
}

/// Moments of the sample. Degenerate samples (zero variance) report zero
/// skewness and kurtosis rather than NaN.
pub fn shape(sorted: &[f64]) -> DistributionShape {
    let n = sorted.len().max(1) as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    let (skewness, kurtosis) = if variance > 1e-12 {
        let m3 = sorted.iter().map(|x| (x - mean).powi(3)).sum::<f64>() / n;
        let m4 = sorted.iter().map(|x| (x - mean).powi(4)).sum::<f64>() / n;
        (m3 / variance.powf(1.5), m4 / (variance * variance) - 3.0)
    } else {
        (0.0, 0.0)
    };

    DistributionShape {
        mean,
        median: percentile(sorted, 50.0),
        std_dev,
        variance,
        skewness,
        kurtosis,
        iqr: percentile(sorted, 75.0) - percentile(sorted, 25.0),
        min: sorted.first().copied().unwrap_or(0.0),
        max: sorted.last().copied().unwrap_or(0.0),
    }
}

pub fn confidence_bands(sorted: &[f64]) -> ConfidenceBands {
    let band = |lo, hi| ConfidenceInterval {
        lower: percentile(sorted, lo),
        upper: percentile(sorted, hi),
    };
    ConfidenceBands {
        ci50: band(25.0, 75.0),
        ci80: band(10.0, 90.0),
        ci90: band(5.0, 95.0),
    }
}

/// Histogram over categories plus the NO-GO fraction, given the per-sample
/// classifications.
pub fn category_histogram(
    classified: &[(RiskCategory, OperationalStatus)],
) -> (BTreeMap<String, usize>, f64) {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut no_go = 0usize;
    for (category, status) in classified {
        let key = match category {
            RiskCategory::Low => "LOW",
            RiskCategory::Moderate => "MODERATE",
            RiskCategory::High => "HIGH",
            RiskCategory::Extreme => "EXTREME",
        };
        *counts.entry(key.to_string()).or_default() += 1;
        if *status == OperationalStatus::NoGo {
            no_go += 1;
        }
    }
    let p = if classified.is_empty() {
        0.0
    } else {
        no_go as f64 / classified.len() as f64
    };
    (counts, p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_interpolates_between_ranks() {
        let data = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(percentile(&data, 0.0), 10.0);
        assert_eq!(percentile(&data, 50.0), 30.0);
        assert_eq!(percentile(&data, 100.0), 50.0);
        assert_eq!(percentile(&data, 25.0), 20.0);
        assert_eq!(percentile(&data, 62.5), 35.0);
    }

    #[test]
    fn percentile_handles_degenerate_samples() {
        assert_eq!(percentile(&[], 50.0), 0.0);
        assert_eq!(percentile(&[7.0], 90.0), 7.0);
    }

    #[test]
    fn ladder_is_monotone() {
        let data: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let ladder = percentile_ladder(&data);
        assert!(ladder["p01"] <= ladder["p05"]);
        assert!(ladder["p05"] <= ladder["p50"]);
        assert!(ladder["p50"] <= ladder["p95"]);
        assert!(ladder["p95"] <= ladder["p99"]);
    }

    #[test]
    fn symmetric_sample_has_zero_skew() {
        let data = [10.0, 20.0, 30.0, 40.0, 50.0];
        let s = shape(&data);
        assert_eq!(s.mean, 30.0);
        assert_eq!(s.median, 30.0);
        assert!(s.skewness.abs() < 1e-9);
        assert_eq!(s.iqr, 20.0);
    }

    #[test]
    fn constant_sample_reports_finite_moments() {
        let data = [42.0; 8];
        let s = shape(&data);
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.skewness, 0.0);
        assert_eq!(s.kurtosis, 0.0);
    }

    #[test]
    fn bands_nest_inside_each_other() {
        let data: Vec<f64> = (0..1000).map(|i| (i % 100) as f64).collect();
        let mut sorted = data.clone();
        sorted.sort_by(f64::total_cmp);
        let bands = confidence_bands(&sorted);
        assert!(bands.ci50.lower >= bands.ci80.lower);
        assert!(bands.ci80.lower >= bands.ci90.lower);
        assert!(bands.ci50.upper <= bands.ci80.upper);
        assert!(bands.ci80.upper <= bands.ci90.upper);
    }

    #[test]
    fn histogram_counts_and_no_go_fraction() {
        use OperationalStatus::*;
        use RiskCategory::*;
        let classified = vec![
            (Low, Go),
            (Low, Go),
            (Moderate, Caution),
            (Extreme, NoGo),
        ];
        let (counts, p) = category_histogram(&classified);
        assert_eq!(counts["LOW"], 2);
        assert_eq!(counts["EXTREME"], 1);
        assert_eq!(p, 0.25);
    }
}
