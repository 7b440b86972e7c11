//! Shared, atomically replaceable reference to the active allowlist

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use mintgate_primitives::{Address, Hash256};

use crate::proof::MembershipProof;
use crate::tree::{verify, AllowlistTree};

/// Process-wide handle to the current allowlist tree.
///
/// Clones share the same slot. [`AllowlistHandle::current`] hands out an
/// `Arc` to one complete tree, so a reader keeps a consistent tree/root
/// pair even if [`AllowlistHandle::rotate`] runs concurrently.
#[derive(Debug, Clone)]
pub struct AllowlistHandle {
    inner: Arc<RwLock<Arc<AllowlistTree>>>,
}

impl AllowlistHandle {
    pub fn new(tree: AllowlistTree) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(tree))),
        }
    }

    /// Snapshot of the active tree
    pub fn current(&self) -> Arc<AllowlistTree> {
        Arc::clone(&self.inner.read())
    }

    /// Root of the active tree
    pub fn root(&self) -> Hash256 {
        self.inner.read().root()
    }

    /// Replace the active tree, returning the previous one
    pub fn rotate(&self, tree: AllowlistTree) -> Arc<AllowlistTree> {
        let new_root = tree.root();
        let previous = std::mem::replace(&mut *self.inner.write(), Arc::new(tree));
        info!(old_root = %previous.root(), %new_root, "rotated allowlist");
        previous
    }

    /// Prove and verify membership against a single snapshot.
    ///
    /// Returns the proof when the address verifies, `None` otherwise.
    /// Non-membership is an ordinary outcome, not an error.
    pub fn membership_proof(&self, address: &Address) -> Option<MembershipProof> {
        let tree = self.current();
        let proof = tree.prove_membership(address).ok()?;
        verify(&proof, address, &tree.root()).then_some(proof)
    }

    /// Whether the address is a member of the active allowlist
    pub fn is_member(&self, address: &Address) -> bool {
        self.membership_proof(address).is_some()
    }
}

impl From<AllowlistTree> for AllowlistHandle {
    fn from(tree: AllowlistTree) -> Self {
        Self::new(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last: u8) -> Address {
        let mut bytes = [0x42u8; 20];
        bytes[19] = last;
        Address::from_bytes(bytes).unwrap()
    }

    #[test]
    fn test_is_member() {
        let handle = AllowlistHandle::new(AllowlistTree::build(vec![addr(1), addr(2)]));
        assert!(handle.is_member(&addr(1)));
        assert!(!handle.is_member(&addr(3)));
    }

    #[test]
    fn test_rotate_swaps_membership() {
        let handle = AllowlistHandle::new(AllowlistTree::build(vec![addr(1)]));
        let old_root = handle.root();

        let previous = handle.rotate(AllowlistTree::build(vec![addr(2)]));
        assert_eq!(previous.root(), old_root);
        assert!(!handle.is_member(&addr(1)));
        assert!(handle.is_member(&addr(2)));
    }

    #[test]
    fn test_snapshot_survives_rotation() {
        let handle = AllowlistHandle::new(AllowlistTree::build(vec![addr(1)]));
        let snapshot = handle.current();
        handle.rotate(AllowlistTree::build(vec![addr(2)]));

        let proof = snapshot.prove_membership(&addr(1)).unwrap();
        assert!(verify(&proof, &addr(1), &snapshot.root()));
    }

    #[test]
    fn test_clones_share_slot() {
        let handle = AllowlistHandle::new(AllowlistTree::build(vec![addr(1)]));
        let clone = handle.clone();
        handle.rotate(AllowlistTree::build(vec![addr(2)]));
        assert_eq!(clone.root(), handle.root());
    }

    #[test]
    fn test_concurrent_readers_see_consistent_snapshots() {
        let trees: Vec<AllowlistTree> = (1..=4)
            .map(|n| AllowlistTree::build((1..=n).map(addr)))
            .collect();
        let roots: Vec<Hash256> = trees.iter().map(AllowlistTree::root).collect();
        let handle = AllowlistHandle::new(trees[0].clone());

        std::thread::scope(|s| {
            for _ in 0..4 {
                let handle = handle.clone();
                let roots = &roots;
                s.spawn(move || {
                    for _ in 0..500 {
                        let snapshot = handle.current();
                        assert!(roots.contains(&snapshot.root()));
                        let proof = snapshot.prove_membership(&addr(1)).unwrap();
                        assert!(verify(&proof, &addr(1), &snapshot.root()));
                    }
                });
            }
            for tree in trees.iter().cycle().take(200) {
                handle.rotate(tree.clone());
            }
        });
    }
}
