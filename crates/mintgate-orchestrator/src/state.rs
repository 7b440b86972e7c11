//! Mint attempt state machine

use std::fmt;

/// Phase of a single mint attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MintState {
    Idle,
    FetchingState,
    DecidingLane,
    PricingRequest,
    SubmittingMint,
    AwaitingConfirmation,
    Settled,
    Failed,
}

impl MintState {
    /// Whether `next` is a legal successor of `self`
    pub fn can_transition_to(self, next: MintState) -> bool {
        use MintState::*;
        match (self, next) {
            (Idle, FetchingState)
            | (FetchingState, DecidingLane)
            | (DecidingLane, PricingRequest)
            | (PricingRequest, SubmittingMint)
            | (SubmittingMint, AwaitingConfirmation)
            | (AwaitingConfirmation, Settled) => true,
            (from, Failed) => !from.is_terminal(),
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, MintState::Settled | MintState::Failed)
    }

    /// Cancellation is honoured only until the transaction is dispatched
    pub fn is_cancellable(self) -> bool {
        matches!(
            self,
            MintState::Idle
                | MintState::FetchingState
                | MintState::DecidingLane
                | MintState::PricingRequest
        )
    }
}

impl fmt::Display for MintState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MintState::Idle => "idle",
            MintState::FetchingState => "fetching state",
            MintState::DecidingLane => "deciding lane",
            MintState::PricingRequest => "pricing request",
            MintState::SubmittingMint => "submitting mint",
            MintState::AwaitingConfirmation => "awaiting confirmation",
            MintState::Settled => "settled",
            MintState::Failed => "failed",
        };
        f.write_str(name)
    }
}
