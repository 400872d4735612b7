//! Post-sampling analysis: weighted averages and sensitivity scores.
//!
//! Aggregation consumes the final (interaction-adjusted, normalized) outcome
//! list. Sensitivity works from the parameter list alone and measures raw
//! sampling distributions, so it never sees interaction effects:
//!
//! ```ignore
//! use paramsim_core::analysis::{aggregate, analyze, winner};
//!
//! let averages = aggregate(&report.outcomes, &mut NoopObserver);
//! println!("winner: {:?}", winner(&averages).map(|w| &w.parameter));
//!
//! let sensitivity = analyze(&parameters, 500, seed, None, &mut NoopObserver)?;
//! ```

mod aggregate;
mod sensitivity;

pub use aggregate::{aggregate, winner};
pub use sensitivity::{
    DEFAULT_SENSITIVITY_ITERATIONS, DOMAIN_FLOOR, WIDEN_FRACTION, analyze, perturb,
    total_variation,
};
