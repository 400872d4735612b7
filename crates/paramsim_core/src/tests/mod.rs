//! Integration tests for the outcome simulation engine
//!
//! Tests are organized by topic:
//! - `generation` - Sampling, rounding and outcome aggregation
//! - `interactions` - Interaction matrix, factor floor and normalization
//! - `pipeline` - Full runs through `run_simulation`
//! - `sensitivity` - Range-perturbation sensitivity scores

mod pipeline;
