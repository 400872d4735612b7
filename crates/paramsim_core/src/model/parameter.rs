//! Sampled dimensions
//!
//! A `Parameter` is read-only for the duration of a run. Stages that need a
//! different range (sensitivity analysis) work on owned copies produced by
//! [`Parameter::widened`].

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_WEIGHT: u8 = 5;
pub const MIN_WEIGHT: u8 = 1;
pub const MAX_WEIGHT: u8 = 10;

/// 2^53. Beyond this `f64` can no longer represent every integer, so rounded
/// draws would stop being distinct outcome values.
pub const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Largest bound magnitude a run accepts. Half of [`MAX_EXACT_INTEGER`], so a
/// range widened for sensitivity analysis still samples exactly.
pub const MAX_BOUND_MAGNITUDE: f64 = MAX_EXACT_INTEGER / 2.0;

fn default_weight() -> u8 {
    DEFAULT_WEIGHT
}

/// One user-defined numeric dimension sampled uniformly over `[min, max]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub min: f64,
    pub max: f64,
    /// Coupling weight in `1..=10`, scales interaction strength
    #[serde(default = "default_weight")]
    pub weight: u8,
}

impl Parameter {
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            weight: DEFAULT_WEIGHT,
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: u8) -> Self {
        self.weight = weight;
        self
    }

    /// Width of the sampled range
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// True when every draw yields the same value
    pub fn is_degenerate(&self) -> bool {
        self.span() == 0.0
    }

    /// Position of `value` within the range, `0.0` at `min` and `1.0` at `max`.
    ///
    /// Returns `None` for a zero-width range.
    pub fn normalized_position(&self, value: f64) -> Option<f64> {
        let span = self.span();
        if span == 0.0 {
            None
        } else {
            Some((value - self.min) / span)
        }
    }

    /// Copy of this parameter with its range widened by `fraction` of the span on each side.
    ///
    /// A zero-width range is widened by one unit per side instead. The new lower
    /// bound never goes below `floor`; if the upper bound itself lies below
    /// `floor`, the range collapses onto the widened upper bound.
    #[must_use]
    pub fn widened(&self, fraction: f64, floor: f64) -> Parameter {
        let span = self.span();
        let pad = if span == 0.0 { 1.0 } else { span * fraction };
        let max = self.max + pad;

        Parameter {
            name: self.name.clone(),
            min: (self.min - pad).max(floor).min(max),
            max,
            weight: self.weight,
        }
    }

    /// Reject bounds whose magnitude exceeds `limit`
    pub(crate) fn check_magnitude(&self, limit: f64) -> Result<(), ConfigError> {
        if self.min.abs() > limit || self.max.abs() > limit {
            return Err(ConfigError::BoundsTooLarge {
                name: self.name.clone(),
                min: self.min,
                max: self.max,
                limit,
            });
        }
        Ok(())
    }

    /// Check the invariants required before a run may start
    pub fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName { index });
        }

        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ConfigError::NonFiniteBounds {
                name: self.name.clone(),
                min: self.min,
                max: self.max,
            });
        }

        self.check_magnitude(MAX_BOUND_MAGNITUDE)?;

        if self.min >= self.max {
            return Err(ConfigError::InvertedRange {
                name: self.name.clone(),
                min: self.min,
                max: self.max,
            });
        }

        if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&self.weight) {
            return Err(ConfigError::WeightOutOfRange {
                name: self.name.clone(),
                weight: self.weight,
            });
        }

        Ok(())
    }
}

/// Validate a full parameter list: non-empty, every parameter valid, names unique
pub fn validate_parameters(parameters: &[Parameter]) -> Result<(), ConfigError> {
    if parameters.is_empty() {
        return Err(ConfigError::NoParameters);
    }

    let mut seen = FxHashSet::default();
    for (index, param) in parameters.iter().enumerate() {
        param.validate(index)?;
        if !seen.insert(param.name.as_str()) {
            return Err(ConfigError::DuplicateName {
                name: param.name.clone(),
            });
        }
    }

    Ok(())
}
