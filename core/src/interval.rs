//! Interval analyzer — a customer's personal ordering rhythm.
//!
//! Gaps shorter than `noise_gap_days` are dropped before any statistic
//! is computed: they are split shipments, not separate purchases.
//! The EWMA is the adaptive "expected interval" used downstream as the
//! on-schedule baseline; it is order-sensitive and must be fed gaps
//! in chronological order.

use serde::{Deserialize, Serialize};

use crate::{
    config::IntervalConfig,
    stats::{mean, nearest_rank_median, population_std_dev},
    types::{days_between, sort_by_date, Days, Transaction},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntervalStatistics {
    pub avg_interval_days:        Days,
    pub median_interval_days:     Days,
    pub min_interval_days:        Days,
    pub max_interval_days:        Days,
    pub std_dev_days:             Days,
    pub ewma_interval_days:       Days,
    pub coefficient_of_variation: f64,
    pub is_consistent:            bool,
    /// Number of gaps that survived noise filtering.
    pub gap_count:                usize,
}

/// Day gaps between consecutive orders, chronological, noise removed.
pub fn valid_gaps(transactions: &[Transaction], cfg: &IntervalConfig) -> Vec<f64> {
    let sorted = sort_by_date(transactions);
    sorted
        .windows(2)
        .map(|w| days_between(w[0].date, w[1].date))
        .filter(|gap| *gap >= cfg.noise_gap_days)
        .collect()
}

/// EWMA seeded by the first gap: `e_i = α·g_i + (1−α)·e_{i−1}`.
pub fn ewma(gaps: &[f64], alpha: f64) -> Option<f64> {
    let (first, rest) = gaps.split_first()?;
    Some(rest.iter().fold(*first, |acc, gap| alpha * gap + (1.0 - alpha) * acc))
}

/// Returns `None` when there are too few transactions or too few
/// gaps left after noise filtering.
pub fn analyze_intervals(
    transactions: &[Transaction],
    cfg: &IntervalConfig,
) -> Option<IntervalStatistics> {
    if transactions.len() < cfg.min_transactions {
        log::debug!(
            "interval: {} transactions, need {}",
            transactions.len(),
            cfg.min_transactions,
        );
        return None;
    }

    let gaps = valid_gaps(transactions, cfg);
    if gaps.len() < cfg.min_gaps {
        log::debug!("interval: {} valid gaps, need {}", gaps.len(), cfg.min_gaps);
        return None;
    }

    let avg = mean(&gaps);
    let median = nearest_rank_median(&gaps);
    let min = gaps.iter().copied().fold(f64::INFINITY, f64::min);
    let max = gaps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let std_dev = population_std_dev(&gaps, avg);
    let expected = ewma(&gaps, cfg.ewma_alpha)?;

    let coefficient_of_variation = if avg > 0.0 { std_dev / avg } else { f64::INFINITY };

    // Rounding happens only here, after every intermediate value is final.
    Some(IntervalStatistics {
        avg_interval_days:    avg.round() as Days,
        median_interval_days: median.round() as Days,
        min_interval_days:    min.round() as Days,
        max_interval_days:    max.round() as Days,
        std_dev_days:         std_dev.round() as Days,
        ewma_interval_days:   expected.round() as Days,
        coefficient_of_variation,
        is_consistent: coefficient_of_variation < cfg.consistency_cv,
        gap_count: gaps.len(),
    })
}
