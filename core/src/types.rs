//! Shared primitive types and the ledger-facing input records.
//!
//! Transactions are owned by the upstream ledger connector. The engine
//! reads them, sorts copies of them, and never mutates the originals.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

use crate::error::{EngineError, EngineResult};

/// Stable customer identifier as assigned by the ledger.
pub type CustomerId = String;

/// Whole days. Signed so that clock skew shows up instead of wrapping.
pub type Days = i64;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// One immutable ledger fact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id:     String,
    #[serde(deserialize_with = "deserialize_ledger_date")]
    pub date:   DateTime<Utc>,
    pub amount: f64,
}

impl Transaction {
    pub fn new(id: impl Into<String>, date: DateTime<Utc>, amount: f64) -> Self {
        Self { id: id.into(), date, amount }
    }
}

/// A single customer's full purchase record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderHistory {
    pub customer_id:  CustomerId,
    pub display_name: String,
    /// Externally assigned tier, e.g. a lifetime-revenue bracket.
    pub segment:      String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl OrderHistory {
    pub fn new(
        customer_id: impl Into<CustomerId>,
        display_name: impl Into<String>,
        segment: impl Into<String>,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            customer_id:  customer_id.into(),
            display_name: display_name.into(),
            segment:      segment.into(),
            transactions,
        }
    }

    /// Transactions in ascending date order. Ties keep ledger order.
    pub fn sorted_transactions(&self) -> Vec<Transaction> {
        if self.transactions.windows(2).any(|w| w[1].date < w[0].date) {
            log::debug!(
                "history {}: ledger order differs from date order; re-sorting",
                self.customer_id,
            );
        }
        sort_by_date(&self.transactions)
    }

    /// True when the ledger supplied transactions already in date order.
    pub fn is_chronological(&self) -> bool {
        self.transactions.windows(2).all(|w| w[0].date <= w[1].date)
    }

    /// Check the preconditions the ledger connector is supposed to
    /// guarantee. Fails on the first offending transaction.
    pub fn validate(&self, now: DateTime<Utc>) -> EngineResult<()> {
        let mut seen = HashSet::with_capacity(self.transactions.len());

        for txn in &self.transactions {
            let reason = if txn.id.trim().is_empty() {
                Some("transaction id is empty".to_string())
            } else if !seen.insert(txn.id.as_str()) {
                Some("duplicate transaction id".to_string())
            } else if !txn.amount.is_finite() {
                Some(format!("amount {} is not a finite number", txn.amount))
            } else if txn.amount < 0.0 {
                Some(format!("amount {:.2} is negative", txn.amount))
            } else if txn.date > now {
                Some(format!("dated {} which is after analysis time {}", txn.date, now))
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(EngineError::InvalidTransaction {
                    customer_id:    self.customer_id.clone(),
                    transaction_id: txn.id.clone(),
                    reason,
                });
            }
        }

        Ok(())
    }
}

/// Stable ascending sort by date.
pub fn sort_by_date(transactions: &[Transaction]) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by_key(|t| t.date);
    sorted
}

/// Fractional days from `earlier` to `later`.
pub fn days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_seconds() as f64 / SECONDS_PER_DAY
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` ledger dates.
pub fn parse_ledger_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn deserialize_ledger_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_ledger_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unparseable ledger date '{raw}'")))
}
