//! Customer ordering-pattern recognition and churn-risk engine.
//!
//! Given one customer's order history and an explicit `now`, derive
//! their ordering rhythm, flag deviations from it, and produce a
//! bounded risk score with an honest narrative and a recommended
//! action. Everything in here is synchronous and pure.

pub mod anomaly;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod interval;
pub mod narrative;
pub mod pattern;
pub mod recommendation;
pub mod risk;
pub mod seasonality;
pub mod size;
mod stats;
pub mod synth;
pub mod types;

pub use engine::{analyze, analyze_batch, BatchOutcome, ChurnEngine};
pub use error::{EngineError, EngineResult};
pub use pattern::{analyze_customer_pattern, generate_churn_prediction, ChurnPrediction, CustomerPattern};
pub use types::{OrderHistory, Transaction};
