use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use crate::analysis::{aggregate, analyze, winner};
use crate::config::RunConfig;
use crate::error::{Result, SimulationError};
use crate::generator::generate_outcomes;
use crate::interaction::apply_interactions;
use crate::metrics::{DiagnosticRecorder, RunObserver, TracingObserver};
use crate::model::{Parameter, RunReport, sort_by_probability, validate_parameters};
use crate::normalize::normalize;
use crate::progress::{RunProgress, RunStage};

/// Run the full pipeline with `tracing` instrumentation and no cancellation
pub fn simulate(parameters: &[Parameter], config: &RunConfig) -> Result<RunReport> {
    run_simulation(parameters, config, &mut TracingObserver, None)
}

/// Validate, sample, apply interactions, normalize, aggregate and (optionally)
/// score sensitivity, as one blocking operation.
///
/// Configuration problems are rejected before any sampling. A panic inside the
/// computation is caught here and returned as [`SimulationError::Failed`];
/// `parameters` is only ever read, so nothing is left half-modified.
pub fn run_simulation(
    parameters: &[Parameter],
    config: &RunConfig,
    observer: &mut dyn RunObserver,
    progress: Option<&RunProgress>,
) -> Result<RunReport> {
    validate_parameters(parameters)?;
    config.validate()?;

    if let Some(progress) = progress {
        progress.check()?;
    }

    let seed = config.resolve_seed();
    tracing::info!(
        parameters = parameters.len(),
        iterations = config.iterations,
        seed,
        "starting simulation run"
    );

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        run_stages(parameters, config, seed, observer, progress)
    }));

    match result {
        Ok(report) => report,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!("simulation run failed: {message}");
            Err(SimulationError::Failed(message))
        }
    }
}

fn run_stages(
    parameters: &[Parameter],
    config: &RunConfig,
    seed: u64,
    observer: &mut dyn RunObserver,
    progress: Option<&RunProgress>,
) -> Result<RunReport> {
    let mut recorder = DiagnosticRecorder::new(observer);
    let enter = |stage: RunStage| {
        if let Some(progress) = progress {
            progress.enter(stage);
        }
    };

    // Independent streams for each stage, all derived from the run seed
    let mut seeder = SmallRng::seed_from_u64(seed);
    let sampling_seed = seeder.next_u64();
    let interaction_seed = seeder.next_u64();
    let sensitivity_seed = seeder.next_u64();

    enter(RunStage::Sampling);
    let mut outcomes = generate_outcomes(parameters, config.iterations, sampling_seed)?;
    recorder.on_generated(&outcomes, config.iterations);

    if parameters.len() > 1 {
        enter(RunStage::Interactions);
        let matrix = config
            .interaction
            .build_matrix(parameters, interaction_seed);
        let adjusted = apply_interactions(&outcomes, parameters, &matrix, &mut recorder)?;
        outcomes = normalize(adjusted, &mut recorder);
        sort_by_probability(&mut outcomes);
    }

    enter(RunStage::Aggregating);
    let averages = aggregate(&outcomes, &mut recorder);
    let winner = winner(&averages).cloned();

    let sensitivity = if config.run_sensitivity {
        Some(analyze(
            parameters,
            config.effective_sensitivity_iterations(),
            sensitivity_seed,
            progress,
            &mut recorder,
        )?)
    } else {
        None
    };

    enter(RunStage::Finished);
    Ok(RunReport {
        seed,
        total_iterations: config.iterations,
        outcomes,
        averages,
        winner,
        sensitivity,
        diagnostics: recorder.diagnostics,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
