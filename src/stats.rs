//! Interpolated percentiles over lift series.

use crate::analyzers::types::{LiftStats, OrderedMap};

/// Percentile `p` (0–100) of an ascending slice, linearly interpolated
/// between the two nearest ranks. Returns 0.0 for empty input.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let index = (sorted.len() - 1) as f64 * p / 100.0;
    let lower = index.floor() as usize;
    let upper = lower + 1;

    if upper >= sorted.len() {
        return sorted[sorted.len() - 1];
    }

    let weight = index - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

/// Rounds to one decimal place. Ties on the exact stored value go to the
/// even digit, so `101.25` becomes `101.2`.
pub fn round1(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

/// Sorts `values` in place and computes every requested percentile.
pub fn summarize(values: &mut [f64], percentiles: &[u8]) -> LiftStats {
    values.sort_by(f64::total_cmp);

    let table = percentiles
        .iter()
        .map(|p| (p.to_string(), round1(percentile(values, f64::from(*p)))))
        .collect::<OrderedMap<_>>();

    LiftStats {
        count: values.len(),
        percentiles: table,
    }
}
