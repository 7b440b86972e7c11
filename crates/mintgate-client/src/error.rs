//! Error types for the contract gateway

use mintgate_primitives::Hash256;
use thiserror::Error;

/// Why the ledger refused a mint submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejection {
    #[error("rejected by the wallet owner")]
    UserRejected,

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("execution reverted: {0}")]
    ExecutionReverted(String),

    #[error("{0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Failed to read contract state: {0}")]
    ReadState(String),

    #[error("Malformed contract state field {field}: {reason}")]
    MalformedState { field: &'static str, reason: String },

    #[error("Mint submission failed: {0}")]
    Submit(SubmitRejection),

    #[error("Timed out waiting for confirmation of {0}")]
    ConfirmationTimeout(Hash256),

    #[error("Transaction {tx} reverted: {reason}")]
    Reverted { tx: Hash256, reason: String },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;
