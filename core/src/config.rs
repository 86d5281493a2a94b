use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{EngineError, EngineResult};

/// Hard ceiling on the risk score, whatever `risk_weights.max_score` says.
pub const MAX_RISK_SCORE: u32 = 100;

/// Hard ceiling on the confidence level.
pub const MAX_CONFIDENCE: u32 = 85;

// ── Statistical analyzers ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IntervalConfig {
    pub min_transactions: usize,
    pub min_gaps: usize,
    /// Gaps shorter than this are treated as split shipments of one order.
    pub noise_gap_days: f64,
    pub ewma_alpha: f64,
    /// Coefficient of variation below which a rhythm counts as consistent.
    pub consistency_cv: f64,
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            min_transactions: 6,
            min_gaps: 5,
            noise_gap_days: 7.0,
            ewma_alpha: 0.3,
            consistency_cv: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SizeConfig {
    pub min_transactions: usize,
    pub recent_window: usize,
    pub shrinking_trend_pct: f64,
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            min_transactions: 8,
            recent_window: 3,
            shrinking_trend_pct: -20.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeasonalityConfig {
    pub min_transactions: usize,
    pub peak_multiplier: f64,
    pub low_multiplier: f64,
    pub monthly_buyer_min_months: usize,
    pub annual_buyer_max_orders: usize,
    pub annual_buyer_max_months: usize,
}

impl Default for SeasonalityConfig {
    fn default() -> Self {
        Self {
            min_transactions: 6,
            peak_multiplier: 1.5,
            low_multiplier: 0.5,
            monthly_buyer_min_months: 8,
            annual_buyer_max_orders: 4,
            annual_buyer_max_months: 3,
        }
    }
}

// ── Anomaly detection ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnomalyConfig {
    pub overdue_watch_ratio: f64,
    pub overdue_warning_ratio: f64,
    pub overdue_critical_ratio: f64,
    pub size_warning_decline_pct: f64,
    pub size_critical_decline_pct: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            overdue_watch_ratio: 1.2,
            overdue_warning_ratio: 1.8,
            overdue_critical_ratio: 2.5,
            size_warning_decline_pct: 35.0,
            size_critical_decline_pct: 50.0,
        }
    }
}

// ── Risk scoring ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiskWeights {
    pub interval_critical: u32,
    pub interval_warning: u32,
    pub interval_watch: u32,
    pub size_critical: u32,
    pub size_warning: u32,
    pub size_watch: u32,
    pub recency_critical_days: i64,
    pub recency_critical: u32,
    pub recency_warning_days: i64,
    pub recency_warning: u32,
    /// Scored but never itemized as a signal.
    pub recency_watch_days: i64,
    pub recency_watch: u32,
    pub combined_bonus: u32,
    pub pattern_break_bonus: u32,
    pub max_score: u32,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            interval_critical: 40,
            interval_warning: 25,
            interval_watch: 10,
            size_critical: 30,
            size_warning: 20,
            size_watch: 10,
            recency_critical_days: 180,
            recency_critical: 20,
            recency_warning_days: 120,
            recency_warning: 12,
            recency_watch_days: 90,
            recency_watch: 5,
            combined_bonus: 10,
            pattern_break_bonus: 5,
            max_score: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiskLevelCutoffs {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
}

impl Default for RiskLevelCutoffs {
    fn default() -> Self {
        Self { critical: 60, high: 40, medium: 20 }
    }
}

// ── Prediction output ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfidenceConfig {
    pub strong_min_orders: usize,
    pub strong: u32,
    pub established_min_orders: usize,
    pub established: u32,
    pub moderate_min_orders: usize,
    pub moderate: u32,
    pub emerging_min_orders: usize,
    pub emerging: u32,
    /// Floor used whenever no interval pattern could be derived.
    pub speculative: u32,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            strong_min_orders: 15,
            strong: 85,
            established_min_orders: 10,
            established: 70,
            moderate_min_orders: 8,
            moderate: 55,
            emerging_min_orders: 6,
            emerging: 40,
            speculative: 25,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NarrativeConfig {
    pub established_min_orders: usize,
    pub typical_min_orders: usize,
    pub size_min_orders: usize,
    pub lapse_days: i64,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            established_min_orders: 10,
            typical_min_orders: 6,
            size_min_orders: 8,
            lapse_days: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RevenueConfig {
    /// Assumed orders per year when projecting revenue at risk.
    pub quarters_per_year: f64,
}

impl Default for RevenueConfig {
    fn default() -> Self {
        Self { quarters_per_year: 4.0 }
    }
}

// ── Root ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub interval:          IntervalConfig,
    pub size:              SizeConfig,
    pub seasonality:       SeasonalityConfig,
    pub anomaly:           AnomalyConfig,
    pub risk_weights:      RiskWeights,
    pub risk_levels:       RiskLevelCutoffs,
    pub confidence:        ConfidenceConfig,
    pub narrative:         NarrativeConfig,
    pub revenue:           RevenueConfig,
    pub top_tier_segments: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interval:          IntervalConfig::default(),
            size:              SizeConfig::default(),
            seasonality:       SeasonalityConfig::default(),
            anomaly:           AnomalyConfig::default(),
            risk_weights:      RiskWeights::default(),
            risk_levels:       RiskLevelCutoffs::default(),
            confidence:        ConfidenceConfig::default(),
            narrative:         NarrativeConfig::default(),
            revenue:           RevenueConfig::default(),
            top_tier_segments: vec!["major".into()],
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file. Sections absent from the file keep their
    /// defaults. The result is validated before it is returned.
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| EngineError::Config {
            path:   display.clone(),
            reason: format!("cannot read: {e}"),
        })?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate().map_err(|reason| EngineError::Config { path: display, reason })?;
        log::debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    pub fn is_top_tier(&self, segment: &str) -> bool {
        self.top_tier_segments.iter().any(|s| s.eq_ignore_ascii_case(segment))
    }

    /// Reject threshold sets that would make severities unreachable
    /// or ordering rules ambiguous.
    pub fn validate(&self) -> Result<(), String> {
        let i = &self.interval;
        if !(i.ewma_alpha > 0.0 && i.ewma_alpha <= 1.0) {
            return Err(format!("interval.ewma_alpha must be in (0, 1], got {}", i.ewma_alpha));
        }
        if i.noise_gap_days < 0.0 {
            return Err("interval.noise_gap_days must not be negative".into());
        }
        if i.min_gaps == 0 || i.min_transactions < 2 {
            return Err("interval needs at least 2 transactions and 1 gap".into());
        }
        if self.size.recent_window == 0 {
            return Err("size.recent_window must be at least 1".into());
        }

        let a = &self.anomaly;
        if !(a.overdue_watch_ratio <= a.overdue_warning_ratio
            && a.overdue_warning_ratio <= a.overdue_critical_ratio)
        {
            return Err("anomaly overdue ratios must ascend watch <= warning <= critical".into());
        }
        if a.size_warning_decline_pct > a.size_critical_decline_pct {
            return Err("anomaly size decline: warning must not exceed critical".into());
        }

        let w = &self.risk_weights;
        if !(w.recency_watch_days <= w.recency_warning_days
            && w.recency_warning_days <= w.recency_critical_days)
        {
            return Err("risk_weights recency days must ascend watch <= warning <= critical".into());
        }

        if w.max_score > MAX_RISK_SCORE {
            return Err(format!(
                "risk_weights.max_score must not exceed {MAX_RISK_SCORE}, got {}",
                w.max_score,
            ));
        }

        let l = &self.risk_levels;
        if !(l.medium <= l.high && l.high <= l.critical) {
            return Err("risk_levels must ascend medium <= high <= critical".into());
        }

        let c = &self.confidence;
        if !(c.speculative <= c.emerging
            && c.emerging <= c.moderate
            && c.moderate <= c.established
            && c.established <= c.strong)
        {
            return Err("confidence levels must ascend from speculative to strong".into());
        }
        if c.strong > MAX_CONFIDENCE {
            return Err(format!(
                "confidence.strong must not exceed {MAX_CONFIDENCE}, got {}",
                c.strong,
            ));
        }

        if self.revenue.quarters_per_year < 0.0 {
            return Err("revenue.quarters_per_year must not be negative".into());
        }

        Ok(())
    }
}
