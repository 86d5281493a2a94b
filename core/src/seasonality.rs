//! Seasonality analyzer — calendar concentration of ordering.
//!
//! All years are folded together; only the calendar month matters.
//! The quarterly-buyer test (variance of quarter counts above their
//! mean) is a coarse over-concentration heuristic, not a significance
//! test.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::{config::SeasonalityConfig, types::Transaction};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonalPattern {
    /// Order counts for January..December.
    pub month_counts:         [usize; 12],
    /// Order counts for Q1..Q4.
    pub quarter_counts:       [usize; 4],
    /// Calendar months (1 = January).
    pub peak_months:          Vec<u32>,
    pub low_months:           Vec<u32>,
    pub quarterly_buyer:      bool,
    pub monthly_buyer:        bool,
    pub annual_buyer:         bool,
    pub has_seasonal_pattern: bool,
}

pub fn analyze_seasonality(
    transactions: &[Transaction],
    cfg: &SeasonalityConfig,
) -> Option<SeasonalPattern> {
    let n = transactions.len();
    if n < cfg.min_transactions {
        log::debug!("seasonality: {n} transactions, need {}", cfg.min_transactions);
        return None;
    }

    let mut month_counts = [0usize; 12];
    let mut quarter_counts = [0usize; 4];
    for txn in transactions {
        let month0 = txn.date.month0() as usize;
        month_counts[month0] += 1;
        quarter_counts[month0 / 3] += 1;
    }

    let month_avg = n as f64 / 12.0;
    let quarter_avg = n as f64 / 4.0;

    let months = || (1u32..=12).zip(month_counts.iter().copied());
    let peak_months: Vec<u32> = months()
        .filter(|(_, c)| *c as f64 > month_avg * cfg.peak_multiplier)
        .map(|(m, _)| m)
        .collect();
    let low_months: Vec<u32> = months()
        .filter(|(_, c)| *c == 0 && (*c as f64) < month_avg * cfg.low_multiplier)
        .map(|(m, _)| m)
        .collect();

    let quarter_variance = quarter_counts
        .iter()
        .map(|c| (*c as f64 - quarter_avg).powi(2))
        .sum::<f64>()
        / 4.0;
    let quarterly_buyer = quarter_variance > quarter_avg;

    let active_months = month_counts.iter().filter(|c| **c > 0).count();
    let monthly_buyer = active_months >= cfg.monthly_buyer_min_months;
    let annual_buyer =
        n <= cfg.annual_buyer_max_orders && active_months <= cfg.annual_buyer_max_months;

    let has_seasonal_pattern = !peak_months.is_empty() || quarterly_buyer || annual_buyer;

    Some(SeasonalPattern {
        month_counts,
        quarter_counts,
        peak_months,
        low_months,
        quarterly_buyer,
        monthly_buyer,
        annual_buyer,
        has_seasonal_pattern,
    })
}
