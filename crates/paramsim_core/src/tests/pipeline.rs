//! End-to-end tests through `run_simulation`
//!
//! These tests verify that:
//! - Single-parameter runs report raw sampled frequencies
//! - Multi-parameter runs are interaction-adjusted and normalized
//! - Averages, percentages and the winner are consistent
//! - Invalid input is rejected before sampling
//! - Cancellation and panics surface as errors
//! - A fixed seed reproduces the whole report

use crate::config::{ParameterBuilder, RunBuilder, RunConfig};
use crate::error::{ConfigError, SimulationError};
use crate::metrics::{NoopObserver, RunMetrics, RunObserver};
use crate::model::{MAX_BOUND_MAGNITUDE, MIN_INTERACTION_FACTOR, Outcome, Parameter};
use crate::normalize::is_normalized;
use crate::progress::{RunProgress, RunStage};
use crate::simulation::{run_simulation, simulate};

fn five_parameter_run() -> (Vec<Parameter>, RunConfig) {
    RunBuilder::new()
        .parameter(ParameterBuilder::new("Temperature").range(10.0, 30.0).weight(7))
        .parameter(ParameterBuilder::new("Humidity").range(20.0, 80.0))
        .parameter(ParameterBuilder::new("Pressure").range(0.0, 5.0).weight(2))
        .parameter(ParameterBuilder::new("Wind").range(1.0, 3.0).weight(10))
        .parameter(ParameterBuilder::new("Cloud").range(0.0, 1.0))
        .iterations(10_000)
        .seed(2024)
        .build()
}

/// One parameter over [0, 1]: no interactions, frequencies reported as is
#[test]
fn test_single_parameter_raw_frequencies() {
    let (params, config) = RunBuilder::new()
        .parameter(ParameterBuilder::new("A").range(0.0, 1.0))
        .iterations(1000)
        .seed(5)
        .build();

    let mut metrics = RunMetrics::new();
    let report = run_simulation(&params, &config, &mut metrics, None).unwrap();

    assert!(report.outcomes.len() <= 2);
    assert!(!report.interactions_applied());
    for outcome in &report.outcomes {
        assert!(outcome.adjustment.is_none());
        assert_eq!(outcome.probability, outcome.count as f64 / 1000.0);
    }
    assert!((report.total_probability() - 1.0).abs() < 1e-9);

    assert_eq!(metrics.interaction_passes, 0);
    assert_eq!(metrics.normalizations, 0);
    // Main pass, sensitivity baseline and one perturbed pass
    assert_eq!(metrics.generator_passes, 3);
    assert_eq!(metrics.sensitivity_passes, 1);
}

/// Five parameters: averages cover everything and percentages add to 100
#[test]
fn test_five_parameter_averages() {
    let (params, config) = five_parameter_run();
    let report = simulate(&params, &config).unwrap();

    assert_eq!(report.averages.len(), 5);
    for avg in &report.averages {
        assert!(avg.percentage >= 0.0, "{}: {}", avg.parameter, avg.percentage);
    }
    let total: f64 = report.averages.iter().map(|a| a.percentage).sum();
    assert!((total - 100.0).abs() < 1e-6);

    let max = report
        .averages
        .iter()
        .map(|a| a.average)
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(report.averages[0].average, max);
    assert_eq!(report.winner.as_ref(), Some(&report.averages[0]));
    // Humidity averages ~50, far above any other range
    assert_eq!(report.averages[0].parameter, "Humidity");
}

/// Multi-parameter outcomes carry adjustments and still sum to one
#[test]
fn test_multi_parameter_adjusted_and_normalized() {
    let (params, config) = five_parameter_run();
    let report = simulate(&params, &config).unwrap();

    assert!(report.interactions_applied());
    assert!(is_normalized(&report.outcomes));
    for outcome in &report.outcomes {
        assert!(outcome.probability >= 0.0);
        assert!(outcome.interaction_factor().unwrap() >= MIN_INTERACTION_FACTOR);
    }
    assert!(
        report
            .outcomes
            .windows(2)
            .all(|w| w[0].probability >= w[1].probability)
    );
    let counted: u64 = report.outcomes.iter().map(|o| o.count).sum();
    assert_eq!(counted, 10_000);
}

/// Sensitivity uses the capped iteration count and scores every parameter
#[test]
fn test_report_includes_sensitivity() {
    let (params, config) = five_parameter_run();
    let report = simulate(&params, &config).unwrap();

    let sensitivity = report.sensitivity.unwrap();
    assert_eq!(sensitivity.iterations, 500);
    assert_eq!(sensitivity.len(), 5);
    for (param, score) in params.iter().zip(sensitivity.iter()) {
        assert_eq!(param.name, score.parameter);
        assert!(score.score >= 0.0);
    }
}

#[test]
fn test_sensitivity_can_be_skipped() {
    let (params, config) = RunBuilder::new()
        .parameter(ParameterBuilder::new("A").range(0.0, 3.0))
        .parameter(ParameterBuilder::new("B").range(0.0, 3.0))
        .without_sensitivity()
        .seed(1)
        .build();

    let mut metrics = RunMetrics::new();
    let report = run_simulation(&params, &config, &mut metrics, None).unwrap();
    assert!(report.sensitivity.is_none());
    assert_eq!(metrics.generator_passes, 1);
    assert_eq!(metrics.sensitivity_passes, 0);
}

/// Zero-width ranges are handled by the stages but rejected at the run boundary
#[test]
fn test_zero_width_range_rejected() {
    let (params, config) = RunBuilder::new()
        .parameter(ParameterBuilder::new("A").range(0.0, 0.0))
        .parameter(ParameterBuilder::new("B").range(0.0, 0.0))
        .seed(3)
        .build();

    let err = simulate(&params, &config).unwrap_err();
    assert_eq!(
        err,
        SimulationError::Config(ConfigError::InvertedRange {
            name: "A".to_string(),
            min: 0.0,
            max: 0.0,
        })
    );
}

/// Bounds too large to round exactly are rejected instead of saturating
#[test]
fn test_huge_bounds_rejected() {
    let (params, config) = RunBuilder::new()
        .parameter(ParameterBuilder::new("A").range(0.0, 1e20))
        .parameter(ParameterBuilder::new("B").range(0.0, 1.0))
        .seed(3)
        .build();

    let err = simulate(&params, &config).unwrap_err();
    assert_eq!(
        err,
        SimulationError::Config(ConfigError::BoundsTooLarge {
            name: "A".to_string(),
            min: 0.0,
            max: 1e20,
            limit: MAX_BOUND_MAGNITUDE,
        })
    );
}

/// The same seed reproduces the whole report
#[test]
fn test_seeded_runs_reproducible() {
    let (params, config) = five_parameter_run();
    let a = simulate(&params, &config).unwrap();
    let b = simulate(&params, &config).unwrap();

    assert_eq!(a.seed, b.seed);
    assert_eq!(a.outcomes, b.outcomes);
    assert_eq!(a.averages, b.averages);
    assert_eq!(a.sensitivity, b.sensitivity);
}

#[test]
fn test_unseeded_run_reports_its_seed() {
    let params = vec![Parameter::new("A", 0.0, 2.0)];
    let config = RunConfig::default();
    let first = simulate(&params, &config).unwrap();

    let replay = simulate(&params, &config.clone().with_seed(first.seed)).unwrap();
    assert_eq!(first.outcomes, replay.outcomes);
}

/// Invalid configurations fail before any sampling happens
#[test]
fn test_invalid_input_rejected() {
    let config = RunConfig::default().with_seed(1);
    let mut metrics = RunMetrics::new();

    let err = run_simulation(&[], &config, &mut metrics, None).unwrap_err();
    assert_eq!(err, SimulationError::Config(ConfigError::NoParameters));

    let inverted = vec![Parameter::new("A", 5.0, 1.0)];
    let err = run_simulation(&inverted, &config, &mut metrics, None).unwrap_err();
    assert!(matches!(
        err,
        SimulationError::Config(ConfigError::InvertedRange { .. })
    ));

    let duplicate = vec![Parameter::new("A", 0.0, 1.0), Parameter::new("A", 0.0, 2.0)];
    let err = run_simulation(&duplicate, &config, &mut metrics, None).unwrap_err();
    assert!(matches!(
        err,
        SimulationError::Config(ConfigError::DuplicateName { .. })
    ));

    let nan = vec![Parameter::new("A", f64::NAN, 1.0)];
    let err = run_simulation(&nan, &config, &mut metrics, None).unwrap_err();
    assert!(matches!(
        err,
        SimulationError::Config(ConfigError::NonFiniteBounds { .. })
    ));

    assert_eq!(metrics.generator_passes, 0);
}

#[test]
fn test_cancelled_before_start() {
    let (params, config) = five_parameter_run();
    let progress = RunProgress::new();
    progress.cancel();

    let err = run_simulation(&params, &config, &mut NoopObserver, Some(&progress)).unwrap_err();
    assert_eq!(err, SimulationError::Cancelled);
}

#[test]
fn test_progress_reaches_finished() {
    let (params, config) = five_parameter_run();
    let progress = RunProgress::new();
    assert_eq!(progress.stage(), RunStage::Idle);

    run_simulation(&params, &config, &mut NoopObserver, Some(&progress)).unwrap();
    assert_eq!(progress.stage(), RunStage::Finished);
    assert_eq!(progress.sensitivity_fraction(), Some(1.0));
}

/// Cancels the run as soon as the first sensitivity pass finishes
struct CancelAfterFirstPass {
    progress: RunProgress,
}

impl RunObserver for CancelAfterFirstPass {
    fn on_sensitivity_pass(&mut self, _parameter: &str, _score: f64) {
        self.progress.cancel();
    }
}

#[test]
fn test_cancelled_during_sensitivity() {
    let (params, config) = five_parameter_run();
    let progress = RunProgress::new();
    let mut observer = CancelAfterFirstPass {
        progress: progress.clone(),
    };

    let err = run_simulation(&params, &config, &mut observer, Some(&progress)).unwrap_err();
    assert_eq!(err, SimulationError::Cancelled);
    assert_eq!(progress.stage(), RunStage::Sensitivity);
    assert_eq!(progress.passes_completed(), 1);
    assert_eq!(progress.passes_total(), 5);
}

struct PanickingObserver;

impl RunObserver for PanickingObserver {
    fn on_generated(&mut self, _outcomes: &[Outcome], _iterations: usize) {
        panic!("observer exploded");
    }
}

/// A panic inside the run comes back as an error, not an unwind
#[test]
fn test_panic_becomes_failure() {
    let params = vec![Parameter::new("A", 0.0, 1.0)];
    let config = RunConfig::default().with_seed(1);

    let err = run_simulation(&params, &config, &mut PanickingObserver, None).unwrap_err();
    assert_eq!(err, SimulationError::Failed("observer exploded".to_string()));
}
