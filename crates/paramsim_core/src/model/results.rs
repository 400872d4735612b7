//! Derived results handed back to the caller after a run

use serde::{Deserialize, Serialize};

use super::outcome::Outcome;

/// Probability-weighted average of one parameter across all outcomes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterAverage {
    pub parameter: String,
    pub average: f64,
    /// Share of the weighted sum across all parameters, in percent
    pub percentage: f64,
}

/// Sensitivity score for a single parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityScore {
    pub parameter: String,
    /// Total variation between the baseline and perturbed distributions
    pub score: f64,
}

/// Per-parameter sensitivity scores, in parameter order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensitivityReport {
    pub scores: Vec<SensitivityScore>,
    /// Iterations used for each generator pass
    pub iterations: usize,
}

impl SensitivityReport {
    pub fn get(&self, parameter: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|s| s.parameter == parameter)
            .map(|s| s.score)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensitivityScore> {
        self.scores.iter()
    }

    /// Parameter whose perturbation moved the distribution the most
    pub fn most_sensitive(&self) -> Option<&SensitivityScore> {
        self.scores
            .iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

/// Degenerate inputs absorbed with a safe default instead of failing the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// A zero-width range contributed nothing to pairwise interaction
    ZeroWidthRange { parameter: String },
    /// Probabilities summed to zero; a uniform distribution was substituted
    ZeroTotalProbability { outcomes: usize },
    /// The weighted sum across all parameters was zero; 1 was used as the divisor
    ZeroWeightedSum,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::ZeroWidthRange { parameter } => write!(
                f,
                "parameter '{parameter}' has a zero-width range; skipped in interactions"
            ),
            Diagnostic::ZeroTotalProbability { outcomes } => write!(
                f,
                "total probability was zero; assigned uniform probability to {outcomes} outcomes"
            ),
            Diagnostic::ZeroWeightedSum => {
                write!(f, "weighted sum of parameter values was zero; percentages use 1")
            }
        }
    }
}

/// Everything a presenter needs from one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Seed the run actually used, for reproducing it
    pub seed: u64,
    pub total_iterations: usize,
    /// Outcomes sorted by probability, highest first
    pub outcomes: Vec<Outcome>,
    /// Averages sorted by average, highest first
    pub averages: Vec<ParameterAverage>,
    pub winner: Option<ParameterAverage>,
    pub sensitivity: Option<SensitivityReport>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    /// The `n` most probable outcomes
    pub fn top_outcomes(&self, n: usize) -> &[Outcome] {
        &self.outcomes[..n.min(self.outcomes.len())]
    }

    /// True when the interaction stage adjusted the outcomes
    pub fn interactions_applied(&self) -> bool {
        self.outcomes.iter().any(|o| o.adjustment.is_some())
    }

    pub fn total_probability(&self) -> f64 {
        self.outcomes.iter().map(|o| o.probability).sum()
    }
}
