//! Run observation and metrics collection
//!
//! Every pipeline stage reports completion through a [`RunObserver`]. The hooks
//! default to doing nothing, so [`NoopObserver`] adds no work to a run.
//! [`TracingObserver`] forwards stage completions to `tracing`, and
//! [`RunMetrics`] counts what happened for tests and profiling.

use crate::interaction::InteractionMatrix;
use crate::model::{Diagnostic, MIN_INTERACTION_FACTOR, Outcome, ParameterAverage};

/// Hooks invoked once per completed stage
pub trait RunObserver {
    fn on_generated(&mut self, _outcomes: &[Outcome], _iterations: usize) {}

    fn on_interactions_applied(&mut self, _outcomes: &[Outcome], _matrix: &InteractionMatrix) {}

    fn on_normalized(&mut self, _outcomes: &[Outcome]) {}

    fn on_aggregated(&mut self, _averages: &[ParameterAverage]) {}

    fn on_sensitivity_pass(&mut self, _parameter: &str, _score: f64) {}

    fn on_diagnostic(&mut self, _diagnostic: &Diagnostic) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Observer that emits `tracing` events for each stage
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RunObserver for TracingObserver {
    fn on_generated(&mut self, outcomes: &[Outcome], iterations: usize) {
        tracing::debug!(
            distinct = outcomes.len(),
            iterations,
            "generated outcome distribution"
        );
    }

    fn on_interactions_applied(&mut self, outcomes: &[Outcome], matrix: &InteractionMatrix) {
        let clamped = count_clamped(outcomes);
        tracing::debug!(
            outcomes = outcomes.len(),
            parameters = matrix.size(),
            clamped,
            "applied parameter interactions"
        );
    }

    fn on_normalized(&mut self, outcomes: &[Outcome]) {
        tracing::debug!(outcomes = outcomes.len(), "normalized probabilities");
    }

    fn on_aggregated(&mut self, averages: &[ParameterAverage]) {
        if let Some(winner) = averages.first() {
            tracing::debug!(
                parameters = averages.len(),
                winner = %winner.parameter,
                average = winner.average,
                "aggregated parameter averages"
            );
        }
    }

    fn on_sensitivity_pass(&mut self, parameter: &str, score: f64) {
        tracing::debug!(parameter, score, "sensitivity pass complete");
    }

    fn on_diagnostic(&mut self, diagnostic: &Diagnostic) {
        tracing::warn!("{diagnostic}");
    }
}

/// Counters collected over one or more runs
#[derive(Debug, Clone, Default)]
pub struct RunMetrics {
    /// Generator passes (main run plus sensitivity passes)
    pub generator_passes: u64,
    /// Distinct outcomes produced across all generator passes
    pub outcomes_generated: u64,
    pub interaction_passes: u64,
    /// Outcomes whose interaction factor sits at the floor
    pub clamped_factors: u64,
    pub normalizations: u64,
    pub sensitivity_passes: u64,
    pub diagnostics: Vec<Diagnostic>,
}

impl RunMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn had_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

impl RunObserver for RunMetrics {
    fn on_generated(&mut self, outcomes: &[Outcome], _iterations: usize) {
        self.generator_passes += 1;
        self.outcomes_generated += outcomes.len() as u64;
    }

    fn on_interactions_applied(&mut self, outcomes: &[Outcome], _matrix: &InteractionMatrix) {
        self.interaction_passes += 1;
        self.clamped_factors += count_clamped(outcomes);
    }

    fn on_normalized(&mut self, _outcomes: &[Outcome]) {
        self.normalizations += 1;
    }

    fn on_sensitivity_pass(&mut self, _parameter: &str, _score: f64) {
        self.sensitivity_passes += 1;
    }

    fn on_diagnostic(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(diagnostic.clone());
    }
}

/// Observer that keeps diagnostics for the run report and forwards everything
pub(crate) struct DiagnosticRecorder<'a> {
    inner: &'a mut dyn RunObserver,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> DiagnosticRecorder<'a> {
    pub fn new(inner: &'a mut dyn RunObserver) -> Self {
        Self {
            inner,
            diagnostics: Vec::new(),
        }
    }
}

impl RunObserver for DiagnosticRecorder<'_> {
    fn on_generated(&mut self, outcomes: &[Outcome], iterations: usize) {
        self.inner.on_generated(outcomes, iterations);
    }

    fn on_interactions_applied(&mut self, outcomes: &[Outcome], matrix: &InteractionMatrix) {
        self.inner.on_interactions_applied(outcomes, matrix);
    }

    fn on_normalized(&mut self, outcomes: &[Outcome]) {
        self.inner.on_normalized(outcomes);
    }

    fn on_aggregated(&mut self, averages: &[ParameterAverage]) {
        self.inner.on_aggregated(averages);
    }

    fn on_sensitivity_pass(&mut self, parameter: &str, score: f64) {
        self.inner.on_sensitivity_pass(parameter, score);
    }

    fn on_diagnostic(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(diagnostic.clone());
        self.inner.on_diagnostic(diagnostic);
    }
}

fn count_clamped(outcomes: &[Outcome]) -> u64 {
    outcomes
        .iter()
        .filter(|o| {
            o.interaction_factor()
                .is_some_and(|f| f <= MIN_INTERACTION_FACTOR)
        })
        .count() as u64
}
