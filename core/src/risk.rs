//! Risk scorer — five additive factors, clamped to `max_score`.
//!
//! Every factor except the 90-day recency nudge emits an itemized
//! `ChurnSignal`. The nudge adds to the score silently; callers that
//! audit signals against the score must account for it.

use serde::{Deserialize, Serialize};

use crate::{
    anomaly::{IntervalAnomaly, Severity, SizeAnomaly},
    config::{RiskLevelCutoffs, RiskWeights, MAX_RISK_SCORE},
    interval::IntervalStatistics,
    types::Days,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    IntervalExtended,
    SizeDeclining,
    FrequencyDropped,
    PatternBreak,
    CombinedWarning,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChurnSignal {
    pub signal_type: SignalType,
    pub severity:    Severity,
    pub description: String,
    pub evidence:    String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    pub score:   u32,
    pub signals: Vec<ChurnSignal>,
}

impl RiskAssessment {
    pub fn has_signal(&self, signal_type: SignalType) -> bool {
        self.signals.iter().any(|s| s.signal_type == signal_type)
    }
}

pub fn score_risk(
    interval_anomaly: Option<&IntervalAnomaly>,
    size_anomaly: Option<&SizeAnomaly>,
    interval_stats: Option<&IntervalStatistics>,
    days_since_last_order: Days,
    w: &RiskWeights,
) -> RiskAssessment {
    let mut score = 0u32;
    let mut signals = Vec::new();

    // Interval anomaly
    if let Some(a) = interval_anomaly {
        score = score.saturating_add(match a.severity {
            Severity::Critical => w.interval_critical,
            Severity::Warning  => w.interval_warning,
            Severity::Watch    => w.interval_watch,
        });
        signals.push(ChurnSignal {
            signal_type: SignalType::IntervalExtended,
            severity:    a.severity,
            description: a.explanation.clone(),
            evidence:    format!(
                "days_since_last_order={} expected_interval_days={} overdue_ratio={:.2}",
                a.days_since_last_order, a.expected_interval_days, a.overdue_ratio,
            ),
        });
    }

    // Size anomaly
    if let Some(a) = size_anomaly {
        score = score.saturating_add(match a.severity {
            Severity::Critical => w.size_critical,
            Severity::Warning  => w.size_warning,
            Severity::Watch    => w.size_watch,
        });
        signals.push(ChurnSignal {
            signal_type: SignalType::SizeDeclining,
            severity:    a.severity,
            description: a.explanation.clone(),
            evidence:    format!(
                "recent_avg={:.2} historical_avg={:.2} decline_pct={:.1}",
                a.recent_avg, a.historical_avg, a.decline_pct,
            ),
        });
    }

    // Raw recency
    if days_since_last_order > w.recency_critical_days {
        score = score.saturating_add(w.recency_critical);
        signals.push(recency_signal(Severity::Critical, days_since_last_order, w.recency_critical_days));
    } else if days_since_last_order > w.recency_warning_days {
        score = score.saturating_add(w.recency_warning);
        signals.push(recency_signal(Severity::Warning, days_since_last_order, w.recency_warning_days));
    } else if days_since_last_order > w.recency_watch_days {
        // No signal for this band.
        score = score.saturating_add(w.recency_watch);
    }

    // Both anomalies together
    if let (Some(i), Some(s)) = (interval_anomaly, size_anomaly) {
        score = score.saturating_add(w.combined_bonus);
        let severity = if i.severity == Severity::Critical || s.severity == Severity::Critical {
            Severity::Critical
        } else {
            Severity::Warning
        };
        signals.push(ChurnSignal {
            signal_type: SignalType::CombinedWarning,
            severity,
            description: "Ordering has slowed and order sizes have shrunk at the same time.".into(),
            evidence:    format!(
                "interval_severity={} size_severity={}",
                i.severity, s.severity,
            ),
        });
    }

    // A reliable rhythm broken badly
    if let (Some(stats), Some(a)) = (interval_stats, interval_anomaly) {
        if stats.is_consistent && a.severity == Severity::Critical {
            score = score.saturating_add(w.pattern_break_bonus);
            signals.push(ChurnSignal {
                signal_type: SignalType::PatternBreak,
                severity:    Severity::Critical,
                description: format!(
                    "A previously consistent {}-day ordering rhythm has broken.",
                    stats.ewma_interval_days,
                ),
                evidence:    format!(
                    "coefficient_of_variation={:.2} overdue_ratio={:.2}",
                    stats.coefficient_of_variation, a.overdue_ratio,
                ),
            });
        }
    }

    RiskAssessment {
        score: score.min(w.max_score).min(MAX_RISK_SCORE),
        signals,
    }
}

fn recency_signal(severity: Severity, days: Days, threshold: Days) -> ChurnSignal {
    ChurnSignal {
        signal_type: SignalType::FrequencyDropped,
        severity,
        description: format!("No order in {days} days."),
        evidence:    format!("days_since_last_order={days} threshold_days={threshold}"),
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: u32, cutoffs: &RiskLevelCutoffs) -> Self {
        if score >= cutoffs.critical {
            Self::Critical
        } else if score >= cutoffs.high {
            Self::High
        } else if score >= cutoffs.medium {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low      => "low",
            Self::Medium   => "medium",
            Self::High     => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}
