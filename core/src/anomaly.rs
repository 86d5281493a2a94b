//! Anomaly detectors — deviations from a customer's own baseline.
//!
//! The interval detector compares time since the last order with the
//! adaptive EWMA interval, never the flat average. The size detector
//! only fires when the size analyzer already judged orders shrinking.

use serde::{Deserialize, Serialize};

use crate::{
    config::AnomalyConfig,
    interval::IntervalStatistics,
    size::SizeStatistics,
    types::Days,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Watch,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Watch    => "watch",
            Self::Warning  => "warning",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntervalAnomaly {
    pub days_since_last_order:  Days,
    pub expected_interval_days: Days,
    pub days_overdue:           Days,
    pub overdue_ratio:          f64,
    pub severity:               Severity,
    pub explanation:            String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SizeAnomaly {
    pub recent_avg:     f64,
    pub historical_avg: f64,
    pub decline_pct:    f64,
    pub severity:       Severity,
    pub explanation:    String,
}

/// `None` while the customer is within `overdue_watch_ratio` of their
/// expected interval.
pub fn detect_interval_anomaly(
    stats: &IntervalStatistics,
    days_since_last_order: Days,
    cfg: &AnomalyConfig,
) -> Option<IntervalAnomaly> {
    let expected = stats.ewma_interval_days;
    if expected <= 0 {
        return None;
    }

    let days_overdue = days_since_last_order - expected;
    let overdue_ratio = days_since_last_order as f64 / expected as f64;

    if overdue_ratio < cfg.overdue_watch_ratio {
        return None;
    }

    let severity = if overdue_ratio >= cfg.overdue_critical_ratio {
        Severity::Critical
    } else if overdue_ratio >= cfg.overdue_warning_ratio {
        Severity::Warning
    } else {
        Severity::Watch
    };

    let explanation = match severity {
        Severity::Critical => format!(
            "{days_overdue} days overdue: {overdue_ratio:.1}x the expected {expected}-day interval. \
             This is well outside the customer's normal rhythm."
        ),
        Severity::Warning => format!(
            "{days_overdue} days overdue: {overdue_ratio:.1}x the expected {expected}-day interval. \
             The gap is noticeably longer than usual."
        ),
        Severity::Watch => format!(
            "{days_overdue} days past the expected {expected}-day interval \
             ({overdue_ratio:.1}x). Slightly later than usual."
        ),
    };

    log::debug!("interval anomaly: ratio={overdue_ratio:.2} severity={severity}");

    Some(IntervalAnomaly {
        days_since_last_order,
        expected_interval_days: expected,
        days_overdue,
        overdue_ratio,
        severity,
        explanation,
    })
}

pub fn detect_size_anomaly(stats: &SizeStatistics, cfg: &AnomalyConfig) -> Option<SizeAnomaly> {
    if !stats.is_shrinking {
        return None;
    }

    let decline_pct = stats.size_trend_pct.abs();
    let severity = if decline_pct >= cfg.size_critical_decline_pct {
        Severity::Critical
    } else if decline_pct >= cfg.size_warning_decline_pct {
        Severity::Warning
    } else {
        Severity::Watch
    };

    let explanation = format!(
        "Recent orders average ${:.0} versus a historical ${:.0}, a {decline_pct:.0}% decline.",
        stats.recent_avg, stats.historical_avg,
    );

    log::debug!("size anomaly: decline={decline_pct:.1}% severity={severity}");

    Some(SizeAnomaly {
        recent_avg: stats.recent_avg,
        historical_avg: stats.historical_avg,
        decline_pct,
        severity,
        explanation,
    })
}
