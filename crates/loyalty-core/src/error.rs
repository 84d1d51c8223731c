//! Error types for the loyalty ledger.

use crate::ids::IdError;

/// Result type for loyalty ledger operations.
pub type Result<T> = std::result::Result<T, LoyaltyError>;

/// Errors that can occur in loyalty ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LoyaltyError {
    /// A points amount was zero, negative, or not a number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Customer fields failed validation.
    #[error("invalid customer: {0}")]
    InvalidCustomer(String),

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),

    /// Tier bands or other configuration are inconsistent.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Durable storage rejected a write.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for LoyaltyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
