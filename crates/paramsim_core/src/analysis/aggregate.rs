//! Probability-weighted parameter averages

use rustc_hash::FxHashMap;

use crate::metrics::RunObserver;
use crate::model::{Diagnostic, Outcome, ParameterAverage};

/// Weighted average and relative share for every parameter seen in `outcomes`.
///
/// `average` is `Σ value · probability` over all outcomes and `percentage` is
/// that sum's share of the grand total across parameters. A zero grand total is
/// replaced by 1 and reported as [`Diagnostic::ZeroWeightedSum`]. The result is
/// sorted by `average`, highest first; equal averages keep first-seen order.
pub fn aggregate(outcomes: &[Outcome], observer: &mut dyn RunObserver) -> Vec<ParameterAverage> {
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    let mut sums: Vec<(&str, f64)> = Vec::new();
    let mut total_sum = 0.0;

    for outcome in outcomes {
        for pv in &outcome.values {
            let weighted = pv.value as f64 * outcome.probability;
            let slot = *index.entry(pv.name.as_str()).or_insert_with(|| {
                sums.push((pv.name.as_str(), 0.0));
                sums.len() - 1
            });
            sums[slot].1 += weighted;
            total_sum += weighted;
        }
    }

    if total_sum == 0.0 && !sums.is_empty() {
        observer.on_diagnostic(&Diagnostic::ZeroWeightedSum);
        total_sum = 1.0;
    }

    let mut averages: Vec<ParameterAverage> = sums
        .into_iter()
        .map(|(name, sum)| ParameterAverage {
            parameter: name.to_string(),
            average: sum,
            percentage: 100.0 * sum / total_sum,
        })
        .collect();

    averages.sort_by(|a, b| b.average.total_cmp(&a.average));

    observer.on_aggregated(&averages);
    averages
}

/// The top-ranked parameter, if any
pub fn winner(averages: &[ParameterAverage]) -> Option<&ParameterAverage> {
    averages.first()
}
