mod outcome;
mod parameter;
mod results;

pub use outcome::{
    InteractionAdjustment, MIN_INTERACTION_FACTOR, Outcome, OutcomeKey, ParameterValue,
    ProbabilityTier, sort_by_probability,
};
pub use parameter::{
    DEFAULT_WEIGHT, MAX_BOUND_MAGNITUDE, MAX_EXACT_INTEGER, MAX_WEIGHT, MIN_WEIGHT, Parameter,
    validate_parameters,
};
pub use results::{
    Diagnostic, ParameterAverage, RunReport, SensitivityReport, SensitivityScore,
};
