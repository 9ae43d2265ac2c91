//! Monte Carlo uncertainty estimator.
//!
//! Reported METAR values are point estimates of a changing atmosphere. The
//! estimator resamples the observation under measurement noise and
//! short-horizon evolution, scores every draw through the same deterministic
//! pipeline, and summarizes the resulting score distribution. A fixed seed
//! reproduces the estimate bit for bit.

use crate::engine::{self, AssessmentInput};
use crate::error::EngineError;
use crate::observation::{RunwayCandidate, WeatherObservation, Wind};
use crate::options::UncertaintyOptions;
use crate::profile::{self, AircraftProfile};
use crate::score::{self, atmosphere, ScoreInput};
use crate::stats::{self, SensitivityEntry, TemporalPoint, UncertaintyEstimate};
use chrono::Duration;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::f64::consts::PI;
use tracing::debug;

/// Baseline (normal-cluster) measurement noise.
const WIND_DIR_SIGMA_DEG: f64 = 5.0;
const WIND_SPEED_SIGMA_KT: f64 = 2.0;
const TEMP_SIGMA_C: f64 = 2.0;
const TEMP_CLAMP_C: f64 = 4.0;
const PRESSURE_SIGMA_IN_HG: f64 = 0.02;
const PRESSURE_CLAMP_IN_HG: f64 = 0.05;
const VISIBILITY_REL_SIGMA: f64 = 0.15;
const CEILING_REL_SIGMA: f64 = 0.20;

/// Gusts track the steady wind rather than varying independently.
const GUST_CORRELATION: f64 = 0.85;
/// Chance that a draw develops gusts the report did not carry, once the
/// perturbed steady wind is strong enough.
const SPONTANEOUS_GUST_P: f64 = 0.3;
const SPONTANEOUS_GUST_SPEED_KT: f64 = 15.0;

/// Diurnal temperature swing amplitude for the temporal scenarios.
const TEMPORAL_TEMP_AMPLITUDE_C: f64 = 3.0;
/// Hour-to-hour multiplicative drift of the steady wind in the projection.
const TEMPORAL_WIND_WALK_SIGMA: f64 = 0.05;
const TEMPORAL_CONFIDENCE_DECAY: f64 = 0.15;
const TEMPORAL_CONFIDENCE_FLOOR: f64 = 0.3;
const TEMPORAL_HORIZON_HOURS: u32 = 6;

/// Short-horizon weather regime a draw evolves under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScenarioCluster {
    Normal,
    Deteriorating,
    Improving,
    Extreme,
}

impl ScenarioCluster {
    fn label(self) -> &'static str {
        match self {
            ScenarioCluster::Normal => "normal",
            ScenarioCluster::Deteriorating => "deteriorating",
            ScenarioCluster::Improving => "improving",
            ScenarioCluster::Extreme => "extreme",
        }
    }
}

/// Cluster weights: most draws stay near the report, the rest split between
/// plausible improvement, deterioration and a rapid-deterioration tail.
const CLUSTER_WEIGHTS: &[(ScenarioCluster, f64)] = &[
    (ScenarioCluster::Normal, 0.70),
    (ScenarioCluster::Deteriorating, 0.10),
    (ScenarioCluster::Improving, 0.10),
    (ScenarioCluster::Extreme, 0.10),
];

/// Multipliers a cluster applies to the baseline noise. Wind/gust factors
/// scale the perturbation deltas; visibility/ceiling factors scale the values
/// themselves (below 1.0 means conditions worsen).
#[derive(Debug, Clone, Copy)]
struct ClusterBias {
    wind: f64,
    gust: f64,
    visibility: f64,
    ceiling: f64,
}

fn bias(cluster: ScenarioCluster) -> ClusterBias {
    match cluster {
        ScenarioCluster::Normal => ClusterBias {
            wind: 1.0,
            gust: 1.0,
            visibility: 1.0,
            ceiling: 1.0,
        },
        ScenarioCluster::Deteriorating => ClusterBias {
            wind: 1.5,
            gust: 1.8,
            visibility: 0.7,
            ceiling: 0.8,
        },
        ScenarioCluster::Improving => ClusterBias {
            wind: 0.7,
            gust: 0.6,
            visibility: 1.3,
            ceiling: 1.2,
        },
        ScenarioCluster::Extreme => ClusterBias {
            wind: 2.2,
            gust: 2.5,
            visibility: 0.5,
            ceiling: 0.6,
        },
    }
}

fn draw_cluster(rng: &mut StdRng) -> ScenarioCluster {
    let roll: f64 = rng.random();
    let mut acc = 0.0;
    for &(cluster, weight) in CLUSTER_WEIGHTS {
        acc += weight;
        if roll < acc {
            return cluster;
        }
    }
    ScenarioCluster::Normal
}

fn normal(rng: &mut StdRng) -> f64 {
    rng.sample(StandardNormal)
}

/// Run the estimator for one runway.
pub fn estimate(
    input: &AssessmentInput,
    runway: &RunwayCandidate,
    opts: &UncertaintyOptions,
) -> Result<UncertaintyEstimate, EngineError> {
    let aircraft = profile::resolve_aircraft(input.aircraft.as_deref())?;
    let pilot = profile::resolve_pilot(input.pilot.as_deref())?;
    let multiplier = input
        .options
        .threshold_multiplier_override
        .unwrap_or(pilot.threshold_multiplier);

    let mut rng = StdRng::seed_from_u64(opts.seed);
    let iterations = opts.iterations.max(1);

    let mut scores = Vec::with_capacity(iterations);
    let mut classified = Vec::with_capacity(iterations);
    let mut scenario_clusters = std::collections::BTreeMap::new();
    for _ in 0..iterations {
        let cluster = draw_cluster(&mut rng);
        *scenario_clusters
            .entry(cluster.label().to_string())
            .or_insert(0usize) += 1;
        let obs = perturb(&input.observation, bias(cluster), &mut rng);
        let s = sample_score(input, runway, &aircraft, &obs)?;
        classified.push(engine::classify(s.round() as u8, multiplier));
        scores.push(s);
    }
    scores.sort_by(f64::total_cmp);

    let (category_counts, no_go_probability) = stats::category_histogram(&classified);
    let base_score = sample_score(input, runway, &aircraft, &input.observation)?;
    let sensitivity = sensitivity(input, runway, &aircraft, base_score)?;
    let temporal = if opts.include_temporal {
        temporal_evolution(input, runway, &aircraft, iterations, &mut rng)?
    } else {
        Vec::new()
    };

    debug!(
        runway = %runway.ident,
        iterations,
        seed = opts.seed,
        median = stats::percentile(&scores, 50.0),
        no_go_probability,
        "uncertainty estimate complete"
    );

    Ok(UncertaintyEstimate {
        iterations,
        seed: opts.seed,
        percentiles: stats::percentile_ladder(&scores),
        shape: stats::shape(&scores),
        confidence: stats::confidence_bands(&scores),
        category_counts,
        scenario_clusters,
        no_go_probability,
        sensitivity,
        temporal,
    })
}

/// One draw: resample each reported field under the cluster-biased noise.
/// Missing fields stay missing; the draw never invents data the report
/// lacked, gusts excepted.
fn perturb(obs: &WeatherObservation, bias: ClusterBias, rng: &mut StdRng) -> WeatherObservation {
    let mut out = obs.clone();

    if let Some(wind) = obs.wind {
        let direction =
            (wind.direction_deg + normal(rng) * WIND_DIR_SIGMA_DEG).rem_euclid(360.0);
        let speed_delta = normal(rng) * WIND_SPEED_SIGMA_KT * bias.wind;
        let speed = (wind.speed_kt + speed_delta).max(0.0);
        let gust = match wind.gust_kt {
            Some(g) => {
                let base_diff = (g - wind.speed_kt).max(0.0);
                let diff = (base_diff * bias.gust + GUST_CORRELATION * speed_delta).max(0.0);
                Some(speed + diff)
            }
            None if speed > SPONTANEOUS_GUST_SPEED_KT
                && rng.random_bool(SPONTANEOUS_GUST_P) =>
            {
                Some(speed * rng.random_range(1.3..1.6))
            }
            None => None,
        };
        out.wind = Some(Wind {
            direction_deg: direction,
            speed_kt: speed,
            gust_kt: gust,
        });
    }

    if let Some(temp) = obs.temp_c {
        let delta = (normal(rng) * TEMP_SIGMA_C).clamp(-TEMP_CLAMP_C, TEMP_CLAMP_C);
        out.temp_c = Some((temp + delta).clamp(atmosphere::TEMP_MIN_C, atmosphere::TEMP_MAX_C));
    }

    if let Some(altim) = obs.altimeter_in_hg {
        let delta =
            (normal(rng) * PRESSURE_SIGMA_IN_HG).clamp(-PRESSURE_CLAMP_IN_HG, PRESSURE_CLAMP_IN_HG);
        out.altimeter_in_hg = Some(altim + delta);
    }

    if let Some(vis) = obs.visibility_sm {
        let scale = (bias.visibility * (1.0 + normal(rng) * VISIBILITY_REL_SIGMA)).max(0.0);
        out.visibility_sm = Some(vis * scale);
    }

    if !obs.cloud_layers.is_empty() {
        let scale = (bias.ceiling * (1.0 + normal(rng) * CEILING_REL_SIGMA)).max(0.05);
        for layer in &mut out.cloud_layers {
            layer.base_ft = (layer.base_ft * scale).max(0.0);
        }
    }

    out
}

/// Deterministic 0..=100 score of one observation through the scorer pipeline.
fn sample_score(
    input: &AssessmentInput,
    runway: &RunwayCandidate,
    aircraft: &AircraftProfile,
    obs: &WeatherObservation,
) -> Result<f64, EngineError> {
    let bundle = score::score_runway(&ScoreInput {
        obs,
        airfield: &input.airfield,
        runway,
        aircraft,
        notams: &input.notams,
        options: &input.options,
    })?;
    if bundle.automatic_extreme.is_some() {
        return Ok(100.0);
    }
    Ok(bundle.total_points().round().clamp(0.0, 100.0))
}

/// One-at-a-time nudges, ranked by how far each moves the deterministic score.
fn sensitivity(
    input: &AssessmentInput,
    runway: &RunwayCandidate,
    aircraft: &AircraftProfile,
    base_score: f64,
) -> Result<Vec<SensitivityEntry>, EngineError> {
    let obs = &input.observation;
    let mut entries = Vec::new();

    if let Some(wind) = obs.wind {
        let mut o = obs.clone();
        o.wind = Some(Wind {
            direction_deg: (wind.direction_deg + 10.0).rem_euclid(360.0),
            ..wind
        });
        entries.push(("wind_direction_plus_10_deg", o));

        let mut o = obs.clone();
        o.wind = Some(Wind {
            speed_kt: wind.speed_kt + 5.0,
            gust_kt: wind.gust_kt.map(|g| g + 5.0),
            ..wind
        });
        entries.push(("wind_speed_plus_5_kt", o));

        let mut o = obs.clone();
        o.wind = Some(Wind {
            gust_kt: Some(wind.gust_kt.unwrap_or(wind.speed_kt) + 5.0),
            ..wind
        });
        entries.push(("gust_plus_5_kt", o));
    }

    if let Some(temp) = obs.temp_c {
        let mut o = obs.clone();
        o.temp_c = Some((temp + 3.0).min(atmosphere::TEMP_MAX_C));
        entries.push(("temperature_plus_3_c", o));
    }

    let mut out = Vec::with_capacity(entries.len());
    for (parameter, o) in entries {
        let s = sample_score(input, runway, aircraft, &o)?;
        out.push(SensitivityEntry {
            parameter: parameter.to_string(),
            delta: s - base_score,
        });
    }
    out.sort_by(|a, b| b.delta.abs().total_cmp(&a.delta.abs()));
    Ok(out)
}

/// Project the score 1..=6 hours out: shift the clock, apply the diurnal
/// temperature sinusoid and a multiplicative wind walk, then average a
/// reduced batch of noisy draws per hour.
fn temporal_evolution(
    input: &AssessmentInput,
    runway: &RunwayCandidate,
    aircraft: &AircraftProfile,
    iterations: usize,
    rng: &mut StdRng,
) -> Result<Vec<TemporalPoint>, EngineError> {
    let draws_per_hour = (iterations / 10).max(20);
    let mut points = Vec::with_capacity(TEMPORAL_HORIZON_HOURS as usize);
    let mut wind_walk = 1.0f64;

    for hour in 1..=TEMPORAL_HORIZON_HOURS {
        wind_walk = (wind_walk * (1.0 + normal(rng) * TEMPORAL_WIND_WALK_SIGMA)).clamp(0.5, 2.0);

        let mut base = input.observation.clone();
        base.observed_at += Duration::hours(hour as i64);
        if let Some(temp) = base.temp_c {
            let swing = TEMPORAL_TEMP_AMPLITUDE_C * (hour as f64 * PI / 12.0).sin();
            base.temp_c =
                Some((temp + swing).clamp(atmosphere::TEMP_MIN_C, atmosphere::TEMP_MAX_C));
        }
        if let Some(w) = base.wind {
            base.wind = Some(Wind {
                speed_kt: w.speed_kt * wind_walk,
                gust_kt: w.gust_kt.map(|g| g * wind_walk),
                ..w
            });
        }

        let mut sum = 0.0;
        for _ in 0..draws_per_hour {
            let cluster = draw_cluster(rng);
            let obs = perturb(&base, bias(cluster), rng);
            sum += sample_score(input, runway, aircraft, &obs)?;
        }

        points.push(TemporalPoint {
            hours_ahead: hour,
            mean_score: sum / draws_per_hour as f64,
            confidence: (1.0 - TEMPORAL_CONFIDENCE_DECAY * hour as f64)
                .max(TEMPORAL_CONFIDENCE_FLOOR),
        });
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::{Airfield, CloudCover, CloudLayer};
    use chrono::{TimeZone, Utc};

    fn field() -> Airfield {
        Airfield {
            elevation_ft: 1200.0,
            latitude: None,
            longitude: None,
        }
    }

    fn obs() -> WeatherObservation {
        WeatherObservation {
            wind: Some(Wind {
                direction_deg: 240.0,
                speed_kt: 14.0,
                gust_kt: Some(22.0),
            }),
            visibility_sm: Some(6.0),
            cloud_layers: vec![CloudLayer {
                cover: CloudCover::Broken,
                base_ft: 3500.0,
            }],
            temp_c: Some(22.0),
            dewpoint_c: Some(14.0),
            altimeter_in_hg: Some(29.85),
            pressure_tendency: None,
            wx_codes: vec![],
            observed_at: Utc.with_ymd_and_hms(2025, 7, 10, 18, 0, 0).unwrap(),
        }
    }

    fn input() -> AssessmentInput {
        AssessmentInput::new(
            obs(),
            field(),
            vec![RunwayCandidate::new("22", 220.0).with_length(5000.0)],
        )
    }

    fn run(opts: &UncertaintyOptions) -> UncertaintyEstimate {
        let input = input();
        estimate(&input, &input.runways[0], opts).unwrap()
    }

    #[test]
    fn same_seed_reproduces_the_estimate_exactly() {
        let opts = UncertaintyOptions {
            iterations: 200,
            seed: 42,
            include_temporal: true,
        };
        assert_eq!(run(&opts), run(&opts));
    }

    #[test]
    fn different_seeds_disagree() {
        let a = run(&UncertaintyOptions {
            iterations: 200,
            seed: 1,
            include_temporal: false,
        });
        let b = run(&UncertaintyOptions {
            iterations: 200,
            seed: 2,
            include_temporal: false,
        });
        assert_ne!(a.percentiles, b.percentiles);
    }

    #[test]
    fn percentile_ladder_is_ordered_and_bounded() {
        let e = run(&UncertaintyOptions::default());
        assert!(e.percentiles["p05"] <= e.percentiles["p50"]);
        assert!(e.percentiles["p50"] <= e.percentiles["p95"]);
        assert!(e.shape.min >= 0.0);
        assert!(e.shape.max <= 100.0);
        assert!(e.confidence.ci50.lower >= e.confidence.ci90.lower);
        assert!(e.confidence.ci50.upper <= e.confidence.ci90.upper);
    }

    #[test]
    fn category_counts_cover_every_sample() {
        let e = run(&UncertaintyOptions {
            iterations: 300,
            seed: 7,
            include_temporal: false,
        });
        let total: usize = e.category_counts.values().sum();
        assert_eq!(total, 300);
        assert!(e.no_go_probability >= 0.0 && e.no_go_probability <= 1.0);
    }

    #[test]
    fn scenario_clusters_account_for_every_trial_with_normal_dominant() {
        let e = run(&UncertaintyOptions {
            iterations: 300,
            seed: 7,
            include_temporal: false,
        });
        let total: usize = e.scenario_clusters.values().sum();
        assert_eq!(total, 300);
        let normal = e.scenario_clusters["normal"];
        for (label, count) in &e.scenario_clusters {
            if label != "normal" {
                assert!(normal > *count, "{label} drawn more often than normal");
            }
        }
    }

    #[test]
    fn thunderstorm_saturates_no_go_probability() {
        let mut input = input();
        input.observation.wx_codes = vec!["TSRA".into()];
        let runway = input.runways[0].clone();
        let e = estimate(&input, &runway, &UncertaintyOptions::default()).unwrap();
        assert_eq!(e.no_go_probability, 1.0);
        assert_eq!(e.shape.min, 100.0);
    }

    #[test]
    fn sensitivity_reports_all_nudges_ranked() {
        let e = run(&UncertaintyOptions::default());
        assert_eq!(e.sensitivity.len(), 4);
        for pair in e.sensitivity.windows(2) {
            assert!(pair[0].delta.abs() >= pair[1].delta.abs());
        }
        assert!(e
            .sensitivity
            .iter()
            .any(|s| s.parameter == "wind_speed_plus_5_kt"));
    }

    #[test]
    fn temporal_projection_covers_six_hours_with_decaying_confidence() {
        let e = run(&UncertaintyOptions {
            iterations: 200,
            seed: 3,
            include_temporal: true,
        });
        assert_eq!(e.temporal.len(), 6);
        assert_eq!(e.temporal[0].hours_ahead, 1);
        for pair in e.temporal.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
        assert_eq!(e.temporal[5].confidence, 0.3);
    }

    #[test]
    fn spontaneous_gusts_respect_the_floor() {
        // Strong steady wind without a reported gust: some draws grow one,
        // and any grown gust exceeds the steady wind.
        let mut rng = StdRng::seed_from_u64(11);
        let mut base = obs();
        base.wind = Some(Wind {
            direction_deg: 240.0,
            speed_kt: 20.0,
            gust_kt: None,
        });
        let mut saw_gust = false;
        for _ in 0..200 {
            let drawn = perturb(&base, bias(ScenarioCluster::Normal), &mut rng);
            if let Some(w) = drawn.wind {
                if let Some(g) = w.gust_kt {
                    saw_gust = true;
                    assert!(g >= w.speed_kt);
                }
            }
        }
        assert!(saw_gust);
    }

    #[test]
    fn perturbed_gust_never_drops_below_steady_wind() {
        let mut rng = StdRng::seed_from_u64(5);
        let base = obs();
        for cluster in [
            ScenarioCluster::Normal,
            ScenarioCluster::Deteriorating,
            ScenarioCluster::Improving,
            ScenarioCluster::Extreme,
        ] {
            for _ in 0..100 {
                let drawn = perturb(&base, bias(cluster), &mut rng);
                let w = drawn.wind.unwrap();
                let g = w.gust_kt.unwrap();
                assert!(g >= w.speed_kt, "gust {g} below steady {}", w.speed_kt);
                assert!(w.speed_kt >= 0.0);
                assert!((0.0..360.0).contains(&w.direction_deg));
            }
        }
    }
}
