//! Entry points for callers outside the core.
//!
//! RULES:
//!   - Histories are validated before analysis; a bad history is an
//!     `InvalidTransaction` error, never a misleading prediction.
//!   - Insufficient data is not an error. It flows through as `None`
//!     statistics and a low-confidence prediction.
//!   - `now` is always a parameter. Only `analyze_with_clock` consults
//!     a `Clock`, and only once per call.
//!   - Customers are independent; a batch is a plain map.

use chrono::{DateTime, Utc};

use crate::{
    clock::Clock,
    config::EngineConfig,
    error::{EngineError, EngineResult},
    pattern::{analyze_customer_pattern, generate_churn_prediction, ChurnPrediction},
    types::{CustomerId, OrderHistory},
};

/// Validate, analyze, and predict for one customer.
pub fn analyze(
    history: &OrderHistory,
    now: DateTime<Utc>,
    cfg: &EngineConfig,
) -> EngineResult<ChurnPrediction> {
    history.validate(now)?;
    let pattern = analyze_customer_pattern(history, now, cfg);
    Ok(generate_churn_prediction(&pattern, cfg))
}

/// Result of analyzing many customers against the same `now`.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Successful predictions, in input order.
    pub predictions: Vec<ChurnPrediction>,
    pub failures:    Vec<(CustomerId, EngineError)>,
}

impl BatchOutcome {
    pub fn analyzed(&self) -> usize {
        self.predictions.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

pub fn analyze_batch(
    histories: &[OrderHistory],
    now: DateTime<Utc>,
    cfg: &EngineConfig,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for history in histories {
        match analyze(history, now, cfg) {
            Ok(prediction) => outcome.predictions.push(prediction),
            Err(e) => {
                log::warn!("batch: skipping {}: {e}", history.customer_id);
                outcome.failures.push((history.customer_id.clone(), e));
            }
        }
    }

    log::info!(
        "batch: analyzed={} failed={} now={now}",
        outcome.analyzed(),
        outcome.failed(),
    );

    outcome
}

/// Owns a validated config so callers don't thread it through by hand.
#[derive(Debug, Clone, Default)]
pub struct ChurnEngine {
    config: EngineConfig,
}

impl ChurnEngine {
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate().map_err(|reason| EngineError::Config {
            path: "<in-memory>".into(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn analyze(&self, history: &OrderHistory, now: DateTime<Utc>) -> EngineResult<ChurnPrediction> {
        analyze(history, now, &self.config)
    }

    pub fn analyze_with_clock(
        &self,
        history: &OrderHistory,
        clock: &dyn Clock,
    ) -> EngineResult<ChurnPrediction> {
        self.analyze(history, clock.now())
    }

    pub fn analyze_batch(&self, histories: &[OrderHistory], now: DateTime<Utc>) -> BatchOutcome {
        analyze_batch(histories, now, &self.config)
    }
}
