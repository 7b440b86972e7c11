//! Mint failure taxonomy
//!
//! Every failure says whether a payable transaction may already have been
//! dispatched, so callers can tell a safe retry from a possible double mint.

use thiserror::Error;

use mintgate_client::GatewayError;
use mintgate_primitives::{Address, Hash256};

use crate::state::MintState;

/// Whether blindly retrying a failed mint is safe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrySafety {
    /// No transaction left the orchestrator; retrying cannot double-mint
    NothingSubmitted,
    /// A transaction was (or may have been) dispatched; check the ledger first
    Submitted,
}

/// Terminal failure of a mint attempt
#[derive(Debug, Error)]
pub enum MintFailure {
    /// Quantity was not positive, above the per-wallet limit, or overflowed the cost
    #[error("Invalid quantity {quantity}: {reason}")]
    InvalidQuantity { quantity: i64, reason: String },

    /// Another attempt for this address has not finished yet
    #[error("A mint for {0} is already in flight")]
    AlreadyInFlight(Address),

    /// The caller cancelled before the transaction was dispatched
    #[error("Mint cancelled while {0}")]
    Cancelled(MintState),

    /// Pre-mint state read failed or timed out
    #[error("Failed to read contract state: {0}")]
    ReadState(#[source] GatewayError),

    /// Not enough supply left for the requested quantity
    #[error("Only {remaining} units left, requested {requested}")]
    SupplyExhausted { remaining: u64, requested: u32 },

    /// The ledger refused the mint outright
    #[error("Mint submission failed: {0}")]
    Submit(#[source] GatewayError),

    /// The submit call timed out; the transaction may or may not be dispatched
    #[error("Mint submission timed out; outcome unknown")]
    SubmitOutcomeUnknown,

    /// The transaction was dispatched but not confirmed in time
    #[error("Timed out waiting for confirmation of {0}")]
    ConfirmationTimeout(Hash256),

    /// The transaction was included but reverted
    #[error("Mint transaction {tx} reverted: {reason}")]
    Reverted { tx: Hash256, reason: String },

    /// Confirmation wait failed for another reason
    #[error("Confirmation of {tx} failed: {source}")]
    Confirmation {
        tx: Hash256,
        #[source]
        source: GatewayError,
    },

    /// The mint confirmed but the post-mint state read failed
    #[error("Mint {tx} confirmed but state refresh failed: {source}")]
    RefreshFailed {
        tx: Hash256,
        #[source]
        source: GatewayError,
    },
}

impl MintFailure {
    pub fn retry_safety(&self) -> RetrySafety {
        match self {
            MintFailure::InvalidQuantity { .. }
            | MintFailure::AlreadyInFlight(_)
            | MintFailure::Cancelled(_)
            | MintFailure::ReadState(_)
            | MintFailure::SupplyExhausted { .. } => RetrySafety::NothingSubmitted,
            // An explicit refusal means nothing was broadcast; a transport
            // error mid-request leaves the outcome unknown.
            MintFailure::Submit(err) => match err {
                GatewayError::Submit(_)
                | GatewayError::Unauthorized(_)
                | GatewayError::InvalidHeader(_) => RetrySafety::NothingSubmitted,
                _ => RetrySafety::Submitted,
            },
            MintFailure::SubmitOutcomeUnknown
            | MintFailure::ConfirmationTimeout(_)
            | MintFailure::Reverted { .. }
            | MintFailure::Confirmation { .. }
            | MintFailure::RefreshFailed { .. } => RetrySafety::Submitted,
        }
    }

    /// The dispatched transaction, when one is known
    pub fn tx_hash(&self) -> Option<Hash256> {
        match self {
            MintFailure::ConfirmationTimeout(tx)
            | MintFailure::Reverted { tx, .. }
            | MintFailure::Confirmation { tx, .. }
            | MintFailure::RefreshFailed { tx, .. } => Some(*tx),
            _ => None,
        }
    }

    /// Map a confirmation-wait error for `tx`
    pub(crate) fn from_confirmation(tx: Hash256, err: GatewayError) -> Self {
        match err {
            GatewayError::ConfirmationTimeout(_) => MintFailure::ConfirmationTimeout(tx),
            GatewayError::Reverted { tx, reason } => MintFailure::Reverted { tx, reason },
            source => MintFailure::Confirmation { tx, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mintgate_client::SubmitRejection;

    #[test]
    fn test_pre_submit_failures_are_safe_to_retry() {
        let failures = [
            MintFailure::InvalidQuantity {
                quantity: 0,
                reason: "must be positive".into(),
            },
            MintFailure::Cancelled(MintState::DecidingLane),
            MintFailure::ReadState(GatewayError::ReadState("down".into())),
            MintFailure::Submit(GatewayError::Submit(SubmitRejection::UserRejected)),
        ];
        for failure in failures {
            assert_eq!(failure.retry_safety(), RetrySafety::NothingSubmitted);
            assert_eq!(failure.tx_hash(), None);
        }
    }

    #[test]
    fn test_post_submit_failures_are_unsafe() {
        let tx = Hash256::keccak256(b"tx");
        let failures = [
            MintFailure::SubmitOutcomeUnknown,
            MintFailure::ConfirmationTimeout(tx),
            MintFailure::Reverted {
                tx,
                reason: "sold out".into(),
            },
        ];
        for failure in failures {
            assert_eq!(failure.retry_safety(), RetrySafety::Submitted);
        }
    }

    #[test]
    fn test_submit_transport_error_is_unsafe() {
        let failure = MintFailure::Submit(GatewayError::ApiError {
            status: 502,
            message: "bad gateway".into(),
        });
        assert_eq!(failure.retry_safety(), RetrySafety::Submitted);
    }

    #[test]
    fn test_from_confirmation_mapping() {
        let tx = Hash256::keccak256(b"tx");
        assert!(matches!(
            MintFailure::from_confirmation(tx, GatewayError::ConfirmationTimeout(tx)),
            MintFailure::ConfirmationTimeout(t) if t == tx
        ));
        assert!(matches!(
            MintFailure::from_confirmation(
                tx,
                GatewayError::Reverted {
                    tx,
                    reason: "paused".into()
                }
            ),
            MintFailure::Reverted { .. }
        ));
        assert!(matches!(
            MintFailure::from_confirmation(
                tx,
                GatewayError::ApiError {
                    status: 500,
                    message: "oops".into()
                }
            ),
            MintFailure::Confirmation { .. }
        ));
    }
}
