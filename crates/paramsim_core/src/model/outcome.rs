//! Joint outcomes observed during sampling

use serde::{Deserialize, Serialize};

/// Floor applied to every interaction factor so adjusted probabilities stay positive
pub const MIN_INTERACTION_FACTOR: f64 = 0.1;

/// Canonical identity of an outcome: the rounded value of each parameter, by position.
///
/// Positional keys cannot collide the way concatenated `name:value` strings can,
/// and two trials with identical rounded values always produce equal keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutcomeKey(pub Vec<i64>);

impl OutcomeKey {
    /// Rounded value of the parameter at `index`
    pub fn value_at(&self, index: usize) -> Option<i64> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A named rounded value inside an outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterValue {
    pub name: String,
    pub value: i64,
}

/// Record of the multiplicative adjustment made by the interaction stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionAdjustment {
    /// Probability before the adjustment
    pub original_probability: f64,
    /// Factor applied, never below [`MIN_INTERACTION_FACTOR`]
    pub interaction_factor: f64,
}

/// Coarse display bucket for an outcome's probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbabilityTier {
    High,
    Medium,
    Low,
}

impl ProbabilityTier {
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.1 {
            ProbabilityTier::High
        } else if probability > 0.03 {
            ProbabilityTier::Medium
        } else {
            ProbabilityTier::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProbabilityTier::High => "high",
            ProbabilityTier::Medium => "medium",
            ProbabilityTier::Low => "low",
        }
    }
}

/// One distinct joint combination of rounded parameter values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub key: OutcomeKey,
    /// Values in parameter order
    pub values: Vec<ParameterValue>,
    /// Number of trials that produced exactly these values
    pub count: u64,
    pub probability: f64,
    /// Present once interactions have been applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<InteractionAdjustment>,
}

impl Outcome {
    /// Look up a value by parameter name
    pub fn value(&self, name: &str) -> Option<i64> {
        self.values.iter().find(|v| v.name == name).map(|v| v.value)
    }

    pub fn original_probability(&self) -> Option<f64> {
        self.adjustment.map(|a| a.original_probability)
    }

    pub fn interaction_factor(&self) -> Option<f64> {
        self.adjustment.map(|a| a.interaction_factor)
    }

    /// Interaction effect as a signed percentage, e.g. `+4.2` for a factor of 1.042
    pub fn interaction_effect_pct(&self) -> Option<f64> {
        self.interaction_factor().map(|f| (f - 1.0) * 100.0)
    }

    pub fn probability_tier(&self) -> ProbabilityTier {
        ProbabilityTier::from_probability(self.probability)
    }

    /// Compact label made of the first two `name: value` pairs
    pub fn short_label(&self) -> String {
        let mut label = self
            .values
            .iter()
            .take(2)
            .map(|v| format!("{}: {}", v.name, v.value))
            .collect::<Vec<_>>()
            .join(", ");
        if self.values.len() > 2 {
            label.push_str("...");
        }
        label
    }
}

/// Sort outcomes by probability, highest first. Equal probabilities keep their order.
pub fn sort_by_probability(outcomes: &mut [Outcome]) {
    outcomes.sort_by(|a, b| b.probability.total_cmp(&a.probability));
}
