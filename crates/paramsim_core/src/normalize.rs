//! Probability normalization after interaction adjustment

use crate::metrics::RunObserver;
use crate::model::{Diagnostic, Outcome};

/// Tolerance used when checking that a distribution sums to one
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Rescale probabilities so they sum to 1.
///
/// When the total is zero (or not finite) every outcome gets `1 / len` and a
/// [`Diagnostic::ZeroTotalProbability`] is reported. An empty list is returned as-is.
pub fn normalize(mut outcomes: Vec<Outcome>, observer: &mut dyn RunObserver) -> Vec<Outcome> {
    if outcomes.is_empty() {
        return outcomes;
    }

    let total: f64 = outcomes.iter().map(|o| o.probability).sum();

    if total > 0.0 && total.is_finite() {
        for outcome in &mut outcomes {
            outcome.probability /= total;
        }
    } else {
        observer.on_diagnostic(&Diagnostic::ZeroTotalProbability {
            outcomes: outcomes.len(),
        });
        let uniform = 1.0 / outcomes.len() as f64;
        for outcome in &mut outcomes {
            outcome.probability = uniform;
        }
    }

    observer.on_normalized(&outcomes);
    outcomes
}

/// True when the probabilities sum to 1 within [`PROBABILITY_TOLERANCE`]
pub fn is_normalized(outcomes: &[Outcome]) -> bool {
    let total: f64 = outcomes.iter().map(|o| o.probability).sum();
    (total - 1.0).abs() < PROBABILITY_TOLERANCE
}
