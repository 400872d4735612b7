//! Run Builder
//!
//! Fluent construction of a parameter list and its [`RunConfig`].

use super::RunConfig;
use crate::interaction::InteractionModel;
use crate::model::{DEFAULT_WEIGHT, Parameter};

/// Builder for a single [`Parameter`]
#[derive(Debug, Clone)]
pub struct ParameterBuilder {
    name: String,
    min: f64,
    max: f64,
    weight: u8,
}

impl ParameterBuilder {
    /// Start a parameter over `[0, 100]` with the default weight
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min: 0.0,
            max: 100.0,
            weight: DEFAULT_WEIGHT,
        }
    }

    #[must_use]
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    #[must_use]
    pub fn weight(mut self, weight: u8) -> Self {
        self.weight = weight;
        self
    }

    pub fn build(self) -> Parameter {
        Parameter {
            name: self.name,
            min: self.min,
            max: self.max,
            weight: self.weight,
        }
    }
}

/// Builder for a complete run: parameters plus configuration
#[derive(Debug, Clone, Default)]
pub struct RunBuilder {
    parameters: Vec<Parameter>,
    config: RunConfig,
}

impl RunBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn parameter(mut self, parameter: ParameterBuilder) -> Self {
        self.parameters.push(parameter.build());
        self
    }

    #[must_use]
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.config.iterations = iterations;
        self
    }

    #[must_use]
    pub fn sensitivity_iterations(mut self, iterations: usize) -> Self {
        self.config.sensitivity_iterations = Some(iterations);
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn interaction(mut self, model: InteractionModel) -> Self {
        self.config.interaction = model;
        self
    }

    #[must_use]
    pub fn without_sensitivity(mut self) -> Self {
        self.config.run_sensitivity = false;
        self
    }

    pub fn build(self) -> (Vec<Parameter>, RunConfig) {
        (self.parameters, self.config)
    }
}
