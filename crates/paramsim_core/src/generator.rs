//! Outcome generation by Monte Carlo sampling
//!
//! Each trial draws every parameter uniformly over its range, rounds the draw to
//! the nearest integer and records the resulting joint tuple. Identical tuples
//! collapse into one [`Outcome`] whose probability is its empirical frequency.
//!
//! [`generate_outcomes`] splits the trials into batches with their own seeded
//! RNGs. With the `parallel` feature the batches run on rayon; the partial tallies
//! are merged in batch order either way, so a seed always reproduces the same
//! distribution and the same tie order.

use std::collections::hash_map::Entry;

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_distr::{Distribution, Uniform};
use rustc_hash::FxHashMap;

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::error::ConfigError;
use crate::model::{
    MAX_EXACT_INTEGER, Outcome, OutcomeKey, Parameter, ParameterValue, sort_by_probability,
};

/// Trials per batch in [`generate_outcomes`]
pub const MAX_BATCH_SIZE: usize = 1000;

/// Per-parameter draw, prepared once per generation pass
enum Sampler {
    Fixed(f64),
    Uniform(Uniform<f64>),
}

impl Sampler {
    fn for_parameter(param: &Parameter) -> Result<Self, ConfigError> {
        if !param.min.is_finite() || !param.max.is_finite() {
            return Err(ConfigError::NonFiniteBounds {
                name: param.name.clone(),
                min: param.min,
                max: param.max,
            });
        }
        param.check_magnitude(MAX_EXACT_INTEGER)?;
        if param.min > param.max {
            return Err(ConfigError::InvertedRange {
                name: param.name.clone(),
                min: param.min,
                max: param.max,
            });
        }
        if param.is_degenerate() {
            return Ok(Sampler::Fixed(param.min));
        }

        Uniform::new_inclusive(param.min, param.max)
            .map(Sampler::Uniform)
            .map_err(|_| ConfigError::BoundsTooLarge {
                name: param.name.clone(),
                min: param.min,
                max: param.max,
                limit: MAX_EXACT_INTEGER,
            })
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Sampler::Fixed(value) => *value,
            Sampler::Uniform(dist) => dist.sample(rng),
        }
    }
}

fn prepare(parameters: &[Parameter], iterations: usize) -> Result<Vec<Sampler>, ConfigError> {
    if parameters.is_empty() {
        return Err(ConfigError::NoParameters);
    }
    if iterations == 0 {
        return Err(ConfigError::ZeroIterations);
    }
    parameters.iter().map(Sampler::for_parameter).collect()
}

/// Counts per distinct key, in first-seen order
#[derive(Default)]
struct Tally {
    index: FxHashMap<OutcomeKey, usize>,
    entries: Vec<(OutcomeKey, u64)>,
}

impl Tally {
    fn add(&mut self, key: OutcomeKey, count: u64) {
        match self.index.entry(key) {
            Entry::Occupied(slot) => self.entries[*slot.get()].1 += count,
            Entry::Vacant(slot) => {
                self.entries.push((slot.key().clone(), count));
                slot.insert(self.entries.len() - 1);
            }
        }
    }

    fn merge(&mut self, other: Tally) {
        for (key, count) in other.entries {
            self.add(key, count);
        }
    }

    fn into_outcomes(self, parameters: &[Parameter], iterations: usize) -> Vec<Outcome> {
        let total = iterations as f64;
        let mut outcomes: Vec<Outcome> = self
            .entries
            .into_iter()
            .map(|(key, count)| {
                let values = parameters
                    .iter()
                    .zip(&key.0)
                    .map(|(param, &value)| ParameterValue {
                        name: param.name.clone(),
                        value,
                    })
                    .collect();
                Outcome {
                    key,
                    values,
                    count,
                    probability: count as f64 / total,
                    adjustment: None,
                }
            })
            .collect();

        sort_by_probability(&mut outcomes);
        outcomes
    }
}

fn run_trials<R: Rng + ?Sized>(samplers: &[Sampler], trials: usize, rng: &mut R) -> Tally {
    let mut tally = Tally::default();
    for _ in 0..trials {
        // Samplers only exist for bounds within MAX_EXACT_INTEGER, so the cast is exact
        let key = OutcomeKey(
            samplers
                .iter()
                .map(|s| s.sample(rng).round() as i64)
                .collect(),
        );
        tally.add(key, 1);
    }
    tally
}

/// Sequential generator that owns its random source
pub struct OutcomeGenerator<R> {
    rng: R,
}

impl OutcomeGenerator<SmallRng> {
    /// Generator with a reproducible `SmallRng`
    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> OutcomeGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Run `iterations` trials and return the distinct outcomes, most probable first.
    ///
    /// Ties keep first-seen order. `parameters` is never modified.
    pub fn generate(
        &mut self,
        parameters: &[Parameter],
        iterations: usize,
    ) -> Result<Vec<Outcome>, ConfigError> {
        let samplers = prepare(parameters, iterations)?;
        let tally = run_trials(&samplers, iterations, &mut self.rng);
        Ok(tally.into_outcomes(parameters, iterations))
    }
}

/// Batch-seeded generation, parallel when the `parallel` feature is enabled.
///
/// Batch seeds are drawn from a `SmallRng` seeded with `seed`, so results depend
/// only on `seed` and `iterations`, never on thread scheduling.
pub fn generate_outcomes(
    parameters: &[Parameter],
    iterations: usize,
    seed: u64,
) -> Result<Vec<Outcome>, ConfigError> {
    let samplers = prepare(parameters, iterations)?;

    let num_batches = iterations.div_ceil(MAX_BATCH_SIZE);
    let mut seeder = SmallRng::seed_from_u64(seed);
    let batches: Vec<(u64, usize)> = (0..num_batches)
        .map(|i| {
            let size = if i == num_batches - 1 {
                iterations - i * MAX_BATCH_SIZE
            } else {
                MAX_BATCH_SIZE
            };
            (seeder.next_u64(), size)
        })
        .collect();

    let run_batch = |&(batch_seed, size): &(u64, usize)| {
        let mut rng = SmallRng::seed_from_u64(batch_seed);
        run_trials(&samplers, size, &mut rng)
    };

    #[cfg(feature = "parallel")]
    let tallies: Vec<Tally> = batches.par_iter().map(run_batch).collect();
    #[cfg(not(feature = "parallel"))]
    let tallies: Vec<Tally> = batches.iter().map(run_batch).collect();

    let mut merged = Tally::default();
    for tally in tallies {
        merged.merge(tally);
    }

    Ok(merged.into_outcomes(parameters, iterations))
}
