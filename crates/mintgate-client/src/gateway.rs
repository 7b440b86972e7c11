//! The narrow interface through which the mint contract is reached

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ConfirmationReceipt, ContractSnapshot, MintRequest, TxHandle};

/// Access to the external ledger that holds supply, prices and executes mints.
///
/// Implementations must not retry [`ContractGateway::submit_mint`]: a mint
/// is a payable transaction and resubmitting it is not idempotent.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait ContractGateway: Send + Sync {
    /// Read current contract state, validated into a typed snapshot
    async fn read_state(&self) -> Result<ContractSnapshot>;

    /// Dispatch a mint transaction sending `request.cost`
    async fn submit_mint(&self, request: &MintRequest) -> Result<TxHandle>;

    /// Wait until the transaction is included (or reverted)
    async fn await_confirmation(&self, tx: &TxHandle) -> Result<ConfirmationReceipt>;
}

#[async_trait]
impl<G: ContractGateway + ?Sized> ContractGateway for std::sync::Arc<G> {
    async fn read_state(&self) -> Result<ContractSnapshot> {
        (**self).read_state().await
    }

    async fn submit_mint(&self, request: &MintRequest) -> Result<TxHandle> {
        (**self).submit_mint(request).await
    }

    async fn await_confirmation(&self, tx: &TxHandle) -> Result<ConfirmationReceipt> {
        (**self).await_confirmation(tx).await
    }
}
