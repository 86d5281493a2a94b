//! Small descriptive-statistics helpers shared by the analyzers.
//! Callers guarantee non-empty input.

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Nearest-rank median: element `floor(n/2)` of the ascending sort.
/// For even `n` this is the upper middle value, not an interpolation.
pub(crate) fn nearest_rank_median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted[sorted.len() / 2]
}

/// Population standard deviation (divides by n).
pub(crate) fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
