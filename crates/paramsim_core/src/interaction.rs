//! Pairwise parameter interactions
//!
//! An [`InteractionMatrix`] holds a coupling strength for every pair of
//! parameters. The unscaled strength comes from a pluggable
//! [`InteractionStrength`] and is scaled by the pair's weight factor
//! `(weight_i + weight_j) / 20`. Both built-in strategies are symmetric.
//!
//! [`apply_interactions`] rescales each outcome's probability by
//! `1 + Σ M[i][j] · |pos_i − 0.5| · |pos_j − 0.5|`, so outcomes near the edges
//! of their ranges are affected more than central ones.

use std::f64::consts::PI;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::metrics::RunObserver;
use crate::model::{
    Diagnostic, InteractionAdjustment, MAX_WEIGHT, MIN_INTERACTION_FACTOR, MIN_WEIGHT, Outcome,
    Parameter,
};

/// Bound on the unscaled strength of a pair
pub const MAX_BASE_STRENGTH: f64 = 0.2;

/// Source of the unscaled coupling between two parameters, in
/// `[-MAX_BASE_STRENGTH, MAX_BASE_STRENGTH]`
pub trait InteractionStrength {
    fn strength(&mut self, a: &Parameter, b: &Parameter) -> f64;
}

impl<F> InteractionStrength for F
where
    F: FnMut(&Parameter, &Parameter) -> f64,
{
    fn strength(&mut self, a: &Parameter, b: &Parameter) -> f64 {
        self(a, b)
    }
}

/// Uniform random strength, drawn once per pair
pub struct UniformStrength<R> {
    rng: R,
}

impl UniformStrength<SmallRng> {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> UniformStrength<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> InteractionStrength for UniformStrength<R> {
    fn strength(&mut self, _a: &Parameter, _b: &Parameter) -> f64 {
        self.rng.random_range(-MAX_BASE_STRENGTH..MAX_BASE_STRENGTH)
    }
}

/// Deterministic strength from the weight difference: `+0.2` for equal weights,
/// falling along a cosine to `-0.2` for the widest possible gap.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightAffinity;

impl InteractionStrength for WeightAffinity {
    fn strength(&mut self, a: &Parameter, b: &Parameter) -> f64 {
        let gap = (f64::from(a.weight) - f64::from(b.weight)).abs();
        let widest = f64::from(MAX_WEIGHT - MIN_WEIGHT);
        MAX_BASE_STRENGTH * (PI * gap.min(widest) / widest).cos()
    }
}

/// Which built-in strength strategy a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionModel {
    /// Random coupling per pair, reproducible from the run seed
    #[default]
    Uniform,
    /// Deterministic coupling derived from the pair's weights
    WeightAffinity,
}

impl InteractionModel {
    pub fn build_matrix(&self, parameters: &[Parameter], seed: u64) -> InteractionMatrix {
        match self {
            InteractionModel::Uniform => {
                build_matrix(parameters, &mut UniformStrength::seeded(seed))
            }
            InteractionModel::WeightAffinity => build_matrix(parameters, &mut WeightAffinity),
        }
    }
}

/// Scale applied to a pair's strength, growing with the combined weight
pub fn weight_factor(a: &Parameter, b: &Parameter) -> f64 {
    (f64::from(a.weight) + f64::from(b.weight)) / 20.0
}

/// Square coupling matrix over parameter indices, stored row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionMatrix {
    size: usize,
    data: Vec<f64>,
}

impl InteractionMatrix {
    /// All-zero `size x size` matrix
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            data: vec![0.0; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Entry at row `i`, column `j`. Panics if either index is out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.size + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.size + j] = value;
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.size..(i + 1) * self.size]
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| (0..i).all(|j| self.get(i, j) == self.get(j, i)))
    }
}

/// Build a fresh matrix for `parameters`.
///
/// The diagonal is zero. `strength` is queried once per unordered pair and the
/// scaled value is mirrored, so the result is symmetric.
pub fn build_matrix<S>(parameters: &[Parameter], strength: &mut S) -> InteractionMatrix
where
    S: InteractionStrength + ?Sized,
{
    let n = parameters.len();
    let mut matrix = InteractionMatrix::zeros(n);

    for i in 0..n {
        for j in (i + 1)..n {
            let (a, b) = (&parameters[i], &parameters[j]);
            let base = strength
                .strength(a, b)
                .clamp(-MAX_BASE_STRENGTH, MAX_BASE_STRENGTH);
            let value = base * weight_factor(a, b);
            matrix.set(i, j, value);
            matrix.set(j, i, value);
        }
    }

    matrix
}

/// Interaction factor for one outcome, before the floor is applied.
///
/// Pairs involving a zero-width range are skipped.
fn raw_factor(outcome: &Outcome, parameters: &[Parameter], matrix: &InteractionMatrix) -> f64 {
    let deviations: Vec<Option<f64>> = parameters
        .iter()
        .enumerate()
        .map(|(i, param)| {
            outcome
                .key
                .value_at(i)
                .and_then(|v| param.normalized_position(v as f64))
                .map(|pos| (pos - 0.5).abs())
        })
        .collect();

    let mut factor = 1.0;
    for (i, dev_i) in deviations.iter().enumerate() {
        let Some(dev_i) = dev_i else { continue };
        for (j, dev_j) in deviations.iter().enumerate().skip(i + 1) {
            if let Some(dev_j) = dev_j {
                factor += matrix.get(i, j) * dev_i * dev_j;
            }
        }
    }
    factor
}

/// Rescale every outcome's probability by its interaction factor.
///
/// Returns a new snapshot; each outcome records its original probability and
/// the factor applied. Factors are floored at [`MIN_INTERACTION_FACTOR`].
/// The result is not normalized. A matrix that was not built for `parameters`
/// is rejected with [`ConfigError::MatrixSizeMismatch`].
pub fn apply_interactions(
    outcomes: &[Outcome],
    parameters: &[Parameter],
    matrix: &InteractionMatrix,
    observer: &mut dyn RunObserver,
) -> Result<Vec<Outcome>, ConfigError> {
    if matrix.size() != parameters.len() {
        return Err(ConfigError::MatrixSizeMismatch {
            matrix: matrix.size(),
            parameters: parameters.len(),
        });
    }

    for param in parameters.iter().filter(|p| p.is_degenerate()) {
        observer.on_diagnostic(&Diagnostic::ZeroWidthRange {
            parameter: param.name.clone(),
        });
    }

    let adjusted: Vec<Outcome> = outcomes
        .iter()
        .map(|outcome| {
            let interaction_factor =
                raw_factor(outcome, parameters, matrix).max(MIN_INTERACTION_FACTOR);
            let original_probability = outcome.probability;
            Outcome {
                probability: original_probability * interaction_factor,
                adjustment: Some(InteractionAdjustment {
                    original_probability,
                    interaction_factor,
                }),
                ..outcome.clone()
            }
        })
        .collect();

    observer.on_interactions_applied(&adjusted, matrix);
    Ok(adjusted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::NoopObserver;
    use crate::model::{OutcomeKey, ParameterValue};

    fn outcome(values: &[(&str, i64)], probability: f64) -> Outcome {
        Outcome {
            key: OutcomeKey(values.iter().map(|(_, v)| *v).collect()),
            values: values
                .iter()
                .map(|(n, v)| ParameterValue {
                    name: n.to_string(),
                    value: *v,
                })
                .collect(),
            count: 1,
            probability,
            adjustment: None,
        }
    }

    #[test]
    fn test_matrix_diagonal_zero_and_symmetric() {
        let params = vec![
            Parameter::new("A", 0.0, 10.0).with_weight(1),
            Parameter::new("B", 0.0, 10.0).with_weight(10),
            Parameter::new("C", 0.0, 10.0).with_weight(5),
        ];
        let matrix = build_matrix(&params, &mut UniformStrength::seeded(11));

        assert_eq!(matrix.size(), 3);
        for i in 0..3 {
            assert_eq!(matrix.get(i, i), 0.0);
            for j in 0..3 {
                assert!(matrix.get(i, j).abs() <= MAX_BASE_STRENGTH + 1e-12);
            }
        }
        assert!(matrix.is_symmetric());
    }

    #[test]
    fn test_uniform_strength_reproducible() {
        let params = vec![Parameter::new("A", 0.0, 1.0), Parameter::new("B", 0.0, 1.0)];
        let a = build_matrix(&params, &mut UniformStrength::seeded(5));
        let b = build_matrix(&params, &mut UniformStrength::seeded(5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_weight_affinity_sign() {
        let light = Parameter::new("A", 0.0, 1.0).with_weight(1);
        let heavy = Parameter::new("B", 0.0, 1.0).with_weight(10);
        let also_light = Parameter::new("C", 0.0, 1.0).with_weight(1);

        let mut strategy = WeightAffinity;
        assert!((strategy.strength(&light, &also_light) - 0.2).abs() < 1e-12);
        assert!((strategy.strength(&light, &heavy) + 0.2).abs() < 1e-12);
        assert_eq!(
            strategy.strength(&light, &heavy),
            strategy.strength(&heavy, &light)
        );
    }

    #[test]
    fn test_weight_factor_scales_entries() {
        let params = vec![
            Parameter::new("A", 0.0, 1.0).with_weight(10),
            Parameter::new("B", 0.0, 1.0).with_weight(10),
        ];
        let matrix = build_matrix(&params, &mut |_: &Parameter, _: &Parameter| 0.2);
        assert!((matrix.get(0, 1) - 0.2).abs() < 1e-12);

        let params = vec![
            Parameter::new("A", 0.0, 1.0).with_weight(1),
            Parameter::new("B", 0.0, 1.0).with_weight(1),
        ];
        let matrix = build_matrix(&params, &mut |_: &Parameter, _: &Parameter| 0.2);
        assert!((matrix.get(1, 0) - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_strength_is_clamped() {
        let params = vec![
            Parameter::new("A", 0.0, 1.0).with_weight(10),
            Parameter::new("B", 0.0, 1.0).with_weight(10),
        ];
        let matrix = build_matrix(&params, &mut |_: &Parameter, _: &Parameter| 5.0);
        assert!((matrix.get(0, 1) - MAX_BASE_STRENGTH).abs() < 1e-12);
    }

    #[test]
    fn test_extreme_values_interact_more() {
        let params = vec![Parameter::new("A", 0.0, 10.0), Parameter::new("B", 0.0, 10.0)];
        let mut matrix = InteractionMatrix::zeros(2);
        matrix.set(0, 1, 0.2);
        matrix.set(1, 0, 0.2);

        let outcomes = vec![
            outcome(&[("A", 0), ("B", 10)], 0.5),
            outcome(&[("A", 5), ("B", 5)], 0.5),
        ];
        let adjusted = apply_interactions(&outcomes, &params, &matrix, &mut NoopObserver).unwrap();

        // Corner: 1 + 0.2 * 0.5 * 0.5
        assert!((adjusted[0].interaction_factor().unwrap() - 1.05).abs() < 1e-12);
        assert!((adjusted[0].probability - 0.525).abs() < 1e-12);
        // Center: no deviation
        assert_eq!(adjusted[1].interaction_factor(), Some(1.0));
        assert_eq!(adjusted[1].original_probability(), Some(0.5));

        // Input snapshot is untouched
        assert!(outcomes[0].adjustment.is_none());
    }

    #[test]
    fn test_factor_floor() {
        let params = vec![Parameter::new("A", 0.0, 1.0), Parameter::new("B", 0.0, 1.0)];
        let mut matrix = InteractionMatrix::zeros(2);
        matrix.set(0, 1, -100.0);

        let outcomes = vec![outcome(&[("A", 0), ("B", 1)], 1.0)];
        let adjusted = apply_interactions(&outcomes, &params, &matrix, &mut NoopObserver).unwrap();
        assert_eq!(adjusted[0].interaction_factor(), Some(MIN_INTERACTION_FACTOR));
        assert!((adjusted[0].probability - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_mismatched_matrix_rejected() {
        let params = vec![
            Parameter::new("A", 0.0, 1.0),
            Parameter::new("B", 0.0, 1.0),
            Parameter::new("C", 0.0, 1.0),
        ];
        let matrix = InteractionMatrix::zeros(2);
        let outcomes = vec![outcome(&[("A", 0), ("B", 1), ("C", 1)], 1.0)];

        let err = apply_interactions(&outcomes, &params, &matrix, &mut NoopObserver).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MatrixSizeMismatch {
                matrix: 2,
                parameters: 3
            }
        );
    }
}
