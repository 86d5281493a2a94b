use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid transaction data for customer '{customer_id}' (transaction '{transaction_id}'): {reason}")]
    InvalidTransaction {
        customer_id:    String,
        transaction_id: String,
        reason:         String,
    },

    #[error("Configuration error in {path}: {reason}")]
    Config { path: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
