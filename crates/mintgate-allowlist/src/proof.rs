//! Membership proofs

use serde::{Deserialize, Serialize};

use mintgate_primitives::Hash256;

/// Sibling hashes from a leaf up to the root.
///
/// Carries no left/right flags: verification sorts every pair before
/// hashing, exactly as the tree was built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipProof {
    siblings: Vec<Hash256>,
}

impl MembershipProof {
    pub fn new(siblings: Vec<Hash256>) -> Self {
        Self { siblings }
    }

    /// Sibling hashes, leaf level first
    pub fn siblings(&self) -> &[Hash256] {
        &self.siblings
    }

    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    /// True for a single-leaf tree, where the leaf is the root
    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }

    /// Siblings as `0x`-prefixed hex, the form contract calls expect
    pub fn to_hex_vec(&self) -> Vec<String> {
        self.siblings.iter().map(Hash256::to_prefixed_hex).collect()
    }
}

impl From<Vec<Hash256>> for MembershipProof {
    fn from(siblings: Vec<Hash256>) -> Self {
        Self::new(siblings)
    }
}
