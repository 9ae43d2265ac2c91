// Monte Carlo uncertainty estimates through the public API: determinism,
// bounded distributions and agreement with the deterministic verdict.

use chrono::{TimeZone, Utc};
use runway_risk_engine::{
    assess_with_uncertainty, AssessmentInput, Airfield, CloudCover, CloudLayer, RunwayCandidate,
    UncertaintyOptions, WeatherObservation, Wind,
};
use tracing_subscriber::EnvFilter;

// RUST_LOG makes the engine's tracing output visible; try_init tolerates the
// repeated calls across tests.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn marginal_input() -> AssessmentInput {
    init_logging();
    let obs = WeatherObservation {
        wind: Some(Wind {
            direction_deg: 240.0,
            speed_kt: 12.0,
            gust_kt: Some(18.0),
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
        observed_at: Utc.with_ymd_and_hms(2025, 7, 10, 20, 0, 0).unwrap(),
    };
    AssessmentInput::new(
        obs,
        Airfield {
            elevation_ft: 1200.0,
            latitude: None,
            longitude: None,
        },
        vec![RunwayCandidate::new("22", 220.0).with_length(5000.0)],
    )
}

fn calm_input() -> AssessmentInput {
    init_logging();
    let obs = WeatherObservation {
        wind: Some(Wind {
            direction_deg: 360.0,
            speed_kt: 5.0,
            gust_kt: None,
        }),
        visibility_sm: Some(10.0),
        cloud_layers: vec![],
        temp_c: Some(14.0),
        dewpoint_c: None,
        altimeter_in_hg: Some(29.92),
        pressure_tendency: None,
        wx_codes: vec![],
        observed_at: Utc.with_ymd_and_hms(2025, 7, 10, 18, 0, 0).unwrap(),
    };
    AssessmentInput::new(
        obs,
        Airfield {
            elevation_ft: 500.0,
            latitude: None,
            longitude: None,
        },
        vec![RunwayCandidate::new("36", 360.0).with_length(6000.0)],
    )
}

#[test]
fn identical_seeds_reproduce_verdict_and_estimate() {
    let input = marginal_input();
    let opts = UncertaintyOptions {
        iterations: 300,
        seed: 99,
        include_temporal: true,
    };
    let (a1, e1) = assess_with_uncertainty(&input, &opts).unwrap();
    let (a2, e2) = assess_with_uncertainty(&input, &opts).unwrap();
    assert_eq!(a1, a2);
    assert_eq!(e1, e2);
}

#[test]
fn estimate_echoes_its_parameters_and_stays_bounded() {
    let input = marginal_input();
    let opts = UncertaintyOptions {
        iterations: 250,
        seed: 4,
        include_temporal: false,
    };
    let (_, e) = assess_with_uncertainty(&input, &opts).unwrap();
    assert_eq!(e.iterations, 250);
    assert_eq!(e.seed, 4);
    assert!(e.shape.min >= 0.0 && e.shape.max <= 100.0);
    assert!(e.percentiles["p01"] <= e.percentiles["p99"]);
    assert!(e.temporal.is_empty());
    let sampled: usize = e.category_counts.values().sum();
    assert_eq!(sampled, 250);
}

#[test]
fn deterministic_score_falls_inside_the_wide_band() {
    let input = marginal_input();
    let (a, e) = assess_with_uncertainty(&input, &UncertaintyOptions::default()).unwrap();
    let s = a.score as f64;
    assert!(
        s >= e.percentiles["p01"] - 15.0 && s <= e.percentiles["p99"] + 15.0,
        "deterministic {s} far outside [{}, {}]",
        e.percentiles["p01"],
        e.percentiles["p99"]
    );
}

#[test]
fn calm_conditions_carry_no_no_go_mass() {
    let (_, e) =
        assess_with_uncertainty(&calm_input(), &UncertaintyOptions::default()).unwrap();
    assert_eq!(e.no_go_probability, 0.0);
    assert!(e.shape.mean < 40.0);
}

#[test]
fn marginal_conditions_spread_wider_than_calm_ones() {
    let opts = UncertaintyOptions::default();
    let (_, calm) = assess_with_uncertainty(&calm_input(), &opts).unwrap();
    let (_, rough) = assess_with_uncertainty(&marginal_input(), &opts).unwrap();
    assert!(rough.shape.mean > calm.shape.mean);
}

#[test]
fn temporal_projection_is_opt_in_and_complete() {
    let input = marginal_input();
    let opts = UncertaintyOptions {
        iterations: 200,
        seed: 12,
        include_temporal: true,
    };
    let (_, e) = assess_with_uncertainty(&input, &opts).unwrap();
    assert_eq!(e.temporal.len(), 6);
    assert!(e.temporal.iter().all(|p| p.confidence >= 0.3));
    assert!(e
        .temporal
        .iter()
        .all(|p| (0.0..=100.0).contains(&p.mean_score)));
}

#[test]
fn sensitivity_is_present_and_ranked() {
    let input = marginal_input();
    let (_, e) = assess_with_uncertainty(&input, &UncertaintyOptions::default()).unwrap();
    assert!(!e.sensitivity.is_empty());
    for pair in e.sensitivity.windows(2) {
        assert!(pair[0].delta.abs() >= pair[1].delta.abs());
    }
}
