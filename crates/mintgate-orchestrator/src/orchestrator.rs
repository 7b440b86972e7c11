//! Mint orchestration
//!
//! One call to [`MintOrchestrator::request_mint`] drives one attempt through
//! `Idle → FetchingState → DecidingLane → PricingRequest → SubmittingMint →
//! AwaitingConfirmation → Settled`, or stops in `Failed`. Each attempt makes
//! exactly one state read before pricing, at most one submit, and one state
//! read after confirmation. Nothing is retried internally.

use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use mintgate_allowlist::AllowlistHandle;
use mintgate_client::{
    ConfirmationReceipt, ContractGateway, ContractSnapshot, GatewayError, Lane, MintRequest,
};
use mintgate_primitives::Address;

use crate::cancel::CancelSignal;
use crate::config::OrchestratorConfig;
use crate::error::MintFailure;
use crate::inflight::InFlightRegistry;
use crate::state::MintState;

/// A confirmed mint together with the refreshed contract state
#[derive(Debug, Clone)]
pub struct MintSettlement {
    pub request: MintRequest,
    pub receipt: ConfirmationReceipt,
    /// Contract state read after confirmation
    pub snapshot: ContractSnapshot,
}

impl MintSettlement {
    pub fn new_supply(&self) -> u64 {
        self.snapshot.current_supply
    }
}

/// Result of a mint attempt
#[derive(Debug)]
pub enum MintOutcome {
    Settled(MintSettlement),
    Failed(MintFailure),
}

impl MintOutcome {
    pub fn is_settled(&self) -> bool {
        matches!(self, MintOutcome::Settled(_))
    }

    /// Supply after a settled mint
    pub fn new_supply(&self) -> Option<u64> {
        match self {
            MintOutcome::Settled(settlement) => Some(settlement.new_supply()),
            MintOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&MintFailure> {
        match self {
            MintOutcome::Failed(failure) => Some(failure),
            MintOutcome::Settled(_) => None,
        }
    }

    pub fn into_result(self) -> Result<MintSettlement, MintFailure> {
        match self {
            MintOutcome::Settled(settlement) => Ok(settlement),
            MintOutcome::Failed(failure) => Err(failure),
        }
    }
}

/// Bookkeeping for one attempt's position in the state machine
struct Attempt {
    id: Uuid,
    state: MintState,
}

impl Attempt {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: MintState::Idle,
        }
    }

    fn advance(&mut self, next: MintState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal mint transition {} -> {}",
            self.state,
            next
        );
        debug!(from = %self.state, to = %next, "mint transition");
        self.state = next;
    }

    /// Honour a pending cancellation, if the window is still open
    fn check_cancel(&self, cancel: &CancelSignal) -> Result<(), MintFailure> {
        if self.state.is_cancellable() && cancel.is_cancelled() {
            return Err(MintFailure::Cancelled(self.state));
        }
        Ok(())
    }

    fn fail(&mut self, failure: MintFailure) -> MintOutcome {
        warn!(
            state = %self.state,
            retry_safety = ?failure.retry_safety(),
            error = %failure,
            "mint failed"
        );
        self.advance(MintState::Failed);
        MintOutcome::Failed(failure)
    }
}

/// Coordinates allowlist membership, contract state and mint submission
pub struct MintOrchestrator<G> {
    gateway: G,
    allowlist: AllowlistHandle,
    config: OrchestratorConfig,
    in_flight: InFlightRegistry,
    /// Per-wallet limit from the latest state read, or the configured one
    max_mint: Mutex<Option<u32>>,
}

impl<G: ContractGateway> MintOrchestrator<G> {
    pub fn new(gateway: G, allowlist: AllowlistHandle, config: OrchestratorConfig) -> Self {
        let max_mint = Mutex::new(config.initial_max_mint);
        Self {
            gateway,
            allowlist,
            config,
            in_flight: InFlightRegistry::default(),
            max_mint,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// The allowlist slot; rotate it to change membership for later attempts
    pub fn allowlist(&self) -> &AllowlistHandle {
        &self.allowlist
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Pure membership query against the active allowlist
    pub fn is_member(&self, address: &Address) -> bool {
        self.allowlist.is_member(address)
    }

    /// Whether an attempt for `address` is still running
    pub fn is_in_flight(&self, address: &Address) -> bool {
        self.in_flight.is_active(address)
    }

    /// Per-wallet limit remembered from the latest state read
    pub fn remembered_max_mint(&self) -> Option<u32> {
        *self.max_mint.lock()
    }

    /// Read contract state once and remember its per-wallet limit
    pub async fn refresh_state(&self) -> Result<ContractSnapshot, GatewayError> {
        let snapshot = self.read_state().await?;
        self.remember(&snapshot);
        Ok(snapshot)
    }

    /// Mint `quantity` units for `address`
    pub async fn request_mint(&self, address: Address, quantity: i64) -> MintOutcome {
        self.request_mint_with_cancel(address, quantity, CancelSignal::never())
            .await
    }

    /// Mint with caller-controlled cancellation.
    ///
    /// `cancel` is honoured up to the moment the transaction is submitted.
    /// After that the attempt runs to a terminal state regardless.
    pub async fn request_mint_with_cancel(
        &self,
        address: Address,
        quantity: i64,
        cancel: CancelSignal,
    ) -> MintOutcome {
        let mut attempt = Attempt::new();
        let span = info_span!("mint", attempt = %attempt.id, %address, quantity);
        self.run(&mut attempt, address, quantity, cancel)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        attempt: &mut Attempt,
        address: Address,
        quantity: i64,
        mut cancel: CancelSignal,
    ) -> MintOutcome {
        let units = match self.validate_quantity(quantity) {
            Ok(units) => units,
            Err(failure) => return attempt.fail(failure),
        };

        let _guard = match self.in_flight.try_acquire(address) {
            Some(guard) => guard,
            None => return attempt.fail(MintFailure::AlreadyInFlight(address)),
        };

        if let Err(failure) = attempt.check_cancel(&cancel) {
            return attempt.fail(failure);
        }
        attempt.advance(MintState::FetchingState);

        let snapshot = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return attempt.fail(MintFailure::Cancelled(MintState::FetchingState));
            }
            result = self.read_state() => match result {
                Ok(snapshot) => snapshot,
                Err(err) => return attempt.fail(MintFailure::ReadState(err)),
            },
        };
        self.remember(&snapshot);

        if units > snapshot.max_mint_per_wallet {
            return attempt.fail(MintFailure::InvalidQuantity {
                quantity,
                reason: format!(
                    "exceeds per-wallet limit of {}",
                    snapshot.max_mint_per_wallet
                ),
            });
        }
        if u64::from(units) > snapshot.remaining_supply() {
            return attempt.fail(MintFailure::SupplyExhausted {
                remaining: snapshot.remaining_supply(),
                requested: units,
            });
        }

        if let Err(failure) = attempt.check_cancel(&cancel) {
            return attempt.fail(failure);
        }
        attempt.advance(MintState::DecidingLane);

        // Decided against the allowlist snapshot active right now
        let proof = self.allowlist.membership_proof(&address);
        let lane = if proof.is_some() {
            Lane::Whitelist
        } else {
            Lane::Public
        };
        debug!(%lane, "lane decided");

        if let Err(failure) = attempt.check_cancel(&cancel) {
            return attempt.fail(failure);
        }
        attempt.advance(MintState::PricingRequest);

        let price = snapshot.price_for(lane);
        let cost = match price.checked_mul(u64::from(units)) {
            Some(cost) => cost,
            None => {
                return attempt.fail(MintFailure::InvalidQuantity {
                    quantity,
                    reason: "cost overflows".to_string(),
                })
            }
        };
        let request = match proof {
            Some(proof) => MintRequest::whitelist(address, units, cost, proof),
            None => MintRequest::public(address, units, cost),
        }
        .with_attempt_id(attempt.id);

        // Last point at which cancellation is possible
        if let Err(failure) = attempt.check_cancel(&cancel) {
            return attempt.fail(failure);
        }
        attempt.advance(MintState::SubmittingMint);
        info!(%lane, %cost, "submitting mint");

        let tx = match with_timeout(self.config.submit_timeout(), self.gateway.submit_mint(&request))
            .await
        {
            Some(Ok(tx)) => tx,
            Some(Err(err)) => return attempt.fail(MintFailure::Submit(err)),
            None => return attempt.fail(MintFailure::SubmitOutcomeUnknown),
        };
        attempt.advance(MintState::AwaitingConfirmation);
        info!(tx = %tx.tx_hash, "mint submitted");

        let receipt = match with_timeout(
            self.config.confirmation_timeout(),
            self.gateway.await_confirmation(&tx),
        )
        .await
        {
            Some(Ok(receipt)) => receipt,
            Some(Err(err)) => {
                return attempt.fail(MintFailure::from_confirmation(tx.tx_hash, err))
            }
            None => return attempt.fail(MintFailure::ConfirmationTimeout(tx.tx_hash)),
        };

        let snapshot = match self.read_state().await {
            Ok(snapshot) => snapshot,
            Err(source) => {
                return attempt.fail(MintFailure::RefreshFailed {
                    tx: tx.tx_hash,
                    source,
                })
            }
        };
        self.remember(&snapshot);
        attempt.advance(MintState::Settled);
        info!(
            tx = %receipt.tx_hash,
            block = receipt.block_number,
            new_supply = snapshot.current_supply,
            "mint settled"
        );

        MintOutcome::Settled(MintSettlement {
            request,
            receipt,
            snapshot,
        })
    }

    fn validate_quantity(&self, quantity: i64) -> Result<u32, MintFailure> {
        let invalid = |reason: String| MintFailure::InvalidQuantity { quantity, reason };
        if quantity <= 0 {
            return Err(invalid("must be positive".to_string()));
        }
        let units = u32::try_from(quantity).map_err(|_| invalid("too large".to_string()))?;
        if let Some(max) = self.remembered_max_mint() {
            if units > max {
                return Err(invalid(format!("exceeds per-wallet limit of {max}")));
            }
        }
        Ok(units)
    }

    async fn read_state(&self) -> Result<ContractSnapshot, GatewayError> {
        let timeout = self.config.read_timeout();
        with_timeout(timeout, self.gateway.read_state())
            .await
            .unwrap_or_else(|| {
                Err(GatewayError::ReadState(format!(
                    "timed out after {} ms",
                    timeout.as_millis()
                )))
            })
    }

    fn remember(&self, snapshot: &ContractSnapshot) {
        *self.max_mint.lock() = Some(snapshot.max_mint_per_wallet);
    }
}

/// `None` when the deadline passes first
async fn with_timeout<F: std::future::Future>(limit: Duration, fut: F) -> Option<F::Output> {
    tokio::time::timeout(limit, fut).await.ok()
}
