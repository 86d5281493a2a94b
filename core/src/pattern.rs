//! Orchestrator — composes the analyzers into a `CustomerPattern`,
//! then turns a pattern into a `ChurnPrediction`.
//!
//! Both steps are pure functions of `(history, now, config)`. Nothing
//! here reads a clock, touches storage, or looks at other customers.
//!
//! Flow:
//!   transactions ─┬─ interval ──── interval anomaly ─┐
//!                 ├─ size ──────── size anomaly ─────┼─ risk scorer ─ narrative / action
//!                 └─ seasonality                     │
//!   recency ─────────────────────────────────────────┘

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    anomaly::{detect_interval_anomaly, detect_size_anomaly, IntervalAnomaly, SizeAnomaly},
    config::{ConfidenceConfig, EngineConfig, MAX_CONFIDENCE},
    interval::{analyze_intervals, IntervalStatistics},
    narrative::{generate_narrative, NarrativeInput},
    recommendation::{recommend_action, RecommendationInput},
    risk::{score_risk, ChurnSignal, RiskLevel},
    seasonality::{analyze_seasonality, SeasonalPattern},
    size::{analyze_sizes, SizeStatistics},
    types::{days_between, CustomerId, Days, OrderHistory},
};

// ── Public types ─────────────────────────────────────────────────────────────

/// Full derived snapshot for one customer at one instant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerPattern {
    pub customer_id:           CustomerId,
    pub display_name:          String,
    pub segment:               String,
    pub analyzed_at:           DateTime<Utc>,
    pub order_count:           usize,
    pub first_order_date:      Option<DateTime<Utc>>,
    pub last_order_date:       Option<DateTime<Utc>>,
    pub days_since_last_order: Days,
    pub lifetime_revenue:      f64,
    pub interval_stats:        Option<IntervalStatistics>,
    pub size_stats:            Option<SizeStatistics>,
    pub seasonal_pattern:      Option<SeasonalPattern>,
    pub interval_anomaly:      Option<IntervalAnomaly>,
    pub size_anomaly:          Option<SizeAnomaly>,
    pub signals:               Vec<ChurnSignal>,
    pub risk_score:            u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChurnPrediction {
    pub customer_id:        CustomerId,
    pub display_name:       String,
    pub segment:            String,
    pub generated_at:       DateTime<Utc>,
    pub risk_level:         RiskLevel,
    pub risk_score:         u32,
    pub signals:            Vec<ChurnSignal>,
    pub narrative:          String,
    /// `recent_avg × quarters_per_year`. A fixed-cadence projection,
    /// not a measured figure.
    pub revenue_at_risk:    f64,
    pub recommended_action: String,
    pub confidence_level:   u32,
}

// ── Orchestration ────────────────────────────────────────────────────────────

pub fn analyze_customer_pattern(
    history: &OrderHistory,
    now: DateTime<Utc>,
    cfg: &EngineConfig,
) -> CustomerPattern {
    let transactions = history.sorted_transactions();
    let first_order_date = transactions.first().map(|t| t.date);
    let last_order_date = transactions.last().map(|t| t.date);

    let days_since_last_order = last_order_date
        .map(|last| days_between(last, now).round() as Days)
        .unwrap_or(0);

    let interval_stats = analyze_intervals(&transactions, &cfg.interval);
    let size_stats = analyze_sizes(&transactions, &cfg.size);
    let seasonal_pattern = analyze_seasonality(&transactions, &cfg.seasonality);

    let interval_anomaly = interval_stats
        .as_ref()
        .and_then(|s| detect_interval_anomaly(s, days_since_last_order, &cfg.anomaly));
    let size_anomaly = size_stats
        .as_ref()
        .and_then(|s| detect_size_anomaly(s, &cfg.anomaly));

    let assessment = score_risk(
        interval_anomaly.as_ref(),
        size_anomaly.as_ref(),
        interval_stats.as_ref(),
        days_since_last_order,
        &cfg.risk_weights,
    );

    log::debug!(
        "pattern: {} orders={} days_since={} score={} signals={}",
        history.customer_id,
        transactions.len(),
        days_since_last_order,
        assessment.score,
        assessment.signals.len(),
    );

    CustomerPattern {
        customer_id: history.customer_id.clone(),
        display_name: history.display_name.clone(),
        segment: history.segment.clone(),
        analyzed_at: now,
        order_count: transactions.len(),
        first_order_date,
        last_order_date,
        days_since_last_order,
        lifetime_revenue: transactions.iter().map(|t| t.amount).sum(),
        interval_stats,
        size_stats,
        seasonal_pattern,
        interval_anomaly,
        size_anomaly,
        signals: assessment.signals,
        risk_score: assessment.score,
    }
}

pub fn generate_churn_prediction(pattern: &CustomerPattern, cfg: &EngineConfig) -> ChurnPrediction {
    let risk_level = RiskLevel::from_score(pattern.risk_score, &cfg.risk_levels);

    let revenue_at_risk = pattern
        .size_stats
        .as_ref()
        .map(|s| s.recent_avg * cfg.revenue.quarters_per_year)
        .unwrap_or(0.0);

    let narrative = generate_narrative(
        &NarrativeInput {
            display_name:          &pattern.display_name,
            order_count:           pattern.order_count,
            days_since_last_order: pattern.days_since_last_order,
            interval_stats:        pattern.interval_stats.as_ref(),
            interval_anomaly:      pattern.interval_anomaly.as_ref(),
            size_anomaly:          pattern.size_anomaly.as_ref(),
        },
        &cfg.narrative,
    );

    let recommended_action = recommend_action(&RecommendationInput::new(
        risk_level,
        &pattern.signals,
        &pattern.segment,
        cfg,
    ));

    ChurnPrediction {
        customer_id: pattern.customer_id.clone(),
        display_name: pattern.display_name.clone(),
        segment: pattern.segment.clone(),
        generated_at: pattern.analyzed_at,
        risk_level,
        risk_score: pattern.risk_score,
        signals: pattern.signals.clone(),
        narrative,
        revenue_at_risk,
        recommended_action: recommended_action.to_string(),
        confidence_level: confidence_level(
            pattern.order_count,
            pattern.interval_stats.as_ref(),
            &cfg.confidence,
        ),
    }
}

/// Discrete confidence ladder. Without interval statistics the answer
/// is always the speculative floor, however many orders exist.
pub fn confidence_level(
    order_count: usize,
    interval_stats: Option<&IntervalStatistics>,
    cfg: &ConfidenceConfig,
) -> u32 {
    let Some(stats) = interval_stats else {
        return cfg.speculative.min(MAX_CONFIDENCE);
    };

    let level = if order_count >= cfg.strong_min_orders && stats.is_consistent {
        cfg.strong
    } else if order_count >= cfg.established_min_orders && stats.is_consistent {
        cfg.established
    } else if order_count >= cfg.moderate_min_orders {
        cfg.moderate
    } else if order_count >= cfg.emerging_min_orders {
        cfg.emerging
    } else {
        cfg.speculative
    };

    level.min(MAX_CONFIDENCE)
}
