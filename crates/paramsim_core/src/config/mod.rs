//! Run configuration
//!
//! `RunConfig` carries everything about a run except the parameters
//! themselves. Use [`RunBuilder`] for a fluent way to assemble both:
//!
//! ```ignore
//! use paramsim_core::config::{ParameterBuilder, RunBuilder};
//!
//! let (parameters, config) = RunBuilder::new()
//!     .parameter(ParameterBuilder::new("Temperature").range(10.0, 30.0).weight(7))
//!     .parameter(ParameterBuilder::new("Humidity").range(20.0, 80.0))
//!     .iterations(10_000)
//!     .seed(42)
//!     .build();
//! ```

use serde::{Deserialize, Serialize};

use crate::analysis::DEFAULT_SENSITIVITY_ITERATIONS;
use crate::error::ConfigError;
use crate::interaction::InteractionModel;

pub mod builder;

pub use builder::{ParameterBuilder, RunBuilder};

pub const DEFAULT_ITERATIONS: usize = 1000;

fn default_iterations() -> usize {
    DEFAULT_ITERATIONS
}

fn default_true() -> bool {
    true
}

/// Settings for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Trials in the main run
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Trials per sensitivity pass. `None` uses `min(iterations, 500)`.
    #[serde(default)]
    pub sensitivity_iterations: Option<usize>,

    /// Seed for every random draw in the run. `None` draws one from the OS.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Strength strategy for the interaction matrix
    #[serde(default)]
    pub interaction: InteractionModel,

    /// Whether to run the sensitivity analysis after the main run
    #[serde(default = "default_true")]
    pub run_sensitivity: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            sensitivity_iterations: None,
            seed: None,
            interaction: InteractionModel::default(),
            run_sensitivity: true,
        }
    }
}

impl RunConfig {
    /// Trials per sensitivity pass after applying the default cap
    pub fn effective_sensitivity_iterations(&self) -> usize {
        self.sensitivity_iterations
            .unwrap_or_else(|| self.iterations.min(DEFAULT_SENSITIVITY_ITERATIONS))
    }

    /// The configured seed, or a fresh one from the OS
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 || self.sensitivity_iterations == Some(0) {
            return Err(ConfigError::ZeroIterations);
        }
        Ok(())
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }
}
