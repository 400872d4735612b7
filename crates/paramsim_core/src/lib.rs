//! Monte Carlo parameter outcome simulation library
//!
//! This crate estimates the distribution of joint outcomes for a small set of
//! user-defined numeric parameters. It supports:
//! - Uniform sampling with integer rounding and outcome aggregation
//! - Pairwise interaction effects with pluggable coupling strength
//! - Probability normalization with degenerate-input fallbacks
//! - Probability-weighted parameter averages and a designated winner
//! - Range-perturbation sensitivity analysis (total variation distance)
//!
//! # Builder DSL
//!
//! ```ignore
//! use paramsim_core::config::{ParameterBuilder, RunBuilder};
//! use paramsim_core::simulation::simulate;
//!
//! let (parameters, config) = RunBuilder::new()
//!     .parameter(ParameterBuilder::new("Temperature").range(10.0, 30.0).weight(7))
//!     .parameter(ParameterBuilder::new("Humidity").range(20.0, 80.0))
//!     .iterations(10_000)
//!     .seed(42)
//!     .build();
//!
//! let report = simulate(&parameters, &config)?;
//! for outcome in report.top_outcomes(20) {
//!     println!("{:>6.2}%  {}", outcome.probability * 100.0, outcome.short_label());
//! }
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod error;
pub mod generator;
pub mod interaction;
pub mod metrics;
pub mod normalize;
pub mod progress;
pub mod simulation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{ParameterBuilder, RunBuilder, RunConfig};
pub use error::{ConfigError, SimulationError};
pub use model::{Outcome, Parameter, ParameterAverage, RunReport, SensitivityReport};
pub use progress::{RunProgress, RunStage};
pub use simulation::{run_simulation, simulate};
