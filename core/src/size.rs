//! Size analyzer — trend in order monetary value.

use serde::{Deserialize, Serialize};

use crate::{
    config::SizeConfig,
    stats::{mean, nearest_rank_median, population_std_dev},
    types::{sort_by_date, Transaction},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SizeStatistics {
    pub avg_order_size:    f64,
    pub median_order_size: f64,
    pub std_dev:           f64,
    pub recent_count:      usize,
    pub recent_avg:        f64,
    pub historical_avg:    f64,
    /// Percent change of the recent window against everything before it.
    pub size_trend_pct:    f64,
    pub is_shrinking:      bool,
}

pub fn analyze_sizes(transactions: &[Transaction], cfg: &SizeConfig) -> Option<SizeStatistics> {
    let n = transactions.len();
    if n < cfg.min_transactions {
        log::debug!("size: {n} transactions, need {}", cfg.min_transactions);
        return None;
    }

    let amounts: Vec<f64> = sort_by_date(transactions).iter().map(|t| t.amount).collect();

    let avg = mean(&amounts);
    let median = nearest_rank_median(&amounts);
    let std_dev = population_std_dev(&amounts, avg);

    let recent_count = cfg.recent_window.min(n / 2);
    let (historical, recent) = amounts.split_at(n - recent_count);
    let recent_avg = mean(recent);
    let historical_avg = mean(historical);

    let size_trend_pct = if historical_avg > 0.0 {
        (recent_avg - historical_avg) / historical_avg * 100.0
    } else {
        0.0
    };

    Some(SizeStatistics {
        avg_order_size: avg,
        median_order_size: median,
        std_dev,
        recent_count,
        recent_avg,
        historical_avg,
        size_trend_pct,
        is_shrinking: size_trend_pct <= cfg.shrinking_trend_pct,
    })
}
