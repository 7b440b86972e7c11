//! At most one in-flight mint per address

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use mintgate_primitives::Address;

/// Addresses with a mint attempt that has not reached a terminal state
#[derive(Debug, Default, Clone)]
pub(crate) struct InFlightRegistry {
    active: Arc<Mutex<HashSet<Address>>>,
}

impl InFlightRegistry {
    /// Claim the address, or `None` if an attempt is already running
    pub(crate) fn try_acquire(&self, address: Address) -> Option<InFlightGuard> {
        if !self.active.lock().insert(address) {
            return None;
        }
        Some(InFlightGuard {
            registry: self.clone(),
            address,
        })
    }

    pub(crate) fn is_active(&self, address: &Address) -> bool {
        self.active.lock().contains(address)
    }
}

/// Releases the address when the attempt ends, however it ends
#[derive(Debug)]
pub(crate) struct InFlightGuard {
    registry: InFlightRegistry,
    address: Address,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry.active.lock().remove(&self.address);
    }
}
