//! Error types for allowlist operations

use mintgate_primitives::{Address, AddressError, Hash256};
use thiserror::Error;

/// Errors that can occur while building or querying an allowlist
#[derive(Debug, Error)]
pub enum AllowlistError {
    /// An identifier failed canonical-form validation
    #[error("Invalid identifier #{index} ({value:?}): {reason}")]
    InvalidInput {
        index: usize,
        value: String,
        reason: AddressError,
    },

    /// Proof requested for an address that is not in the allowlist
    #[error("Address {0} is not in the allowlist")]
    NotFound(Address),

    /// A line of an allowlist source could not be parsed
    #[error("Invalid address at line {line}: {reason}")]
    InvalidSourceLine { line: usize, reason: AddressError },

    /// Exported leaves were not strictly ascending
    #[error("Exported leaves are not sorted and unique at position {0}")]
    UnsortedLeaves(usize),

    /// Exported root does not match the recomputed root
    #[error("Root mismatch: expected {expected}, computed {actual}")]
    RootMismatch { expected: Hash256, actual: Hash256 },

    /// I/O error while reading a source
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for allowlist operations
pub type AllowlistResult<T> = Result<T, AllowlistError>;
