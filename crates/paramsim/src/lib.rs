//! Command-line host for the paramsim outcome simulator
//!
//! This crate loads scenarios and presents results. It provides:
//! - YAML scenario files with command-line overrides
//! - Text and JSON reports
//! - A background worker with progress and cancellation
//! - `tracing` setup for stderr or a rotated log file

pub mod logging;
pub mod report;
pub mod scenario;
pub mod worker;

#[cfg(test)]
mod tests;

pub use logging::init_logging;
pub use report::{TextReport, render_json, render_text};
pub use scenario::{Overrides, Scenario, ScenarioFile, load_scenario};
pub use worker::{SimulationRequest, SimulationResponse, SimulationWorker};
