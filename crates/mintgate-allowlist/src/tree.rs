//! Sorted-pair Keccak Merkle tree over an address allowlist
//!
//! Construction rules, mirrored exactly by [`verify`]:
//! - leaf = `keccak256(address_bytes)`
//! - leaves are sorted ascending and deduplicated once, up front
//! - parent = `keccak256(min(left, right) || max(left, right))`
//! - an odd node at the end of a level is promoted unchanged
//! - the empty allowlist has root [`EMPTY_ROOT`]
//!
//! Because the leaf order is canonical the root depends only on the set of
//! addresses, never on the order they were supplied in.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use mintgate_primitives::{Address, Hash256};

use crate::error::{AllowlistError, AllowlistResult};
use crate::proof::MembershipProof;

/// Root of an allowlist with no entries
pub const EMPTY_ROOT: Hash256 = Hash256::zero();

/// Above this many entries leaf hashing is spread over the rayon pool
const PARALLEL_LEAF_THRESHOLD: usize = 4096;

/// Immutable Merkle tree over a set of addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowlistTree {
    /// Level 0 = sorted unique leaves, last level = root.
    /// Empty when the allowlist is empty.
    levels: Vec<Vec<Hash256>>,

    root: Hash256,
}

impl AllowlistTree {
    /// Build a tree from parsed addresses
    pub fn build<I>(addresses: I) -> Self
    where
        I: IntoIterator<Item = Address>,
    {
        let addresses: Vec<Address> = addresses.into_iter().collect();
        let leaves: Vec<Hash256> = if addresses.len() >= PARALLEL_LEAF_THRESHOLD {
            addresses.par_iter().map(Address::leaf_hash).collect()
        } else {
            addresses.iter().map(Address::leaf_hash).collect()
        };
        Self::from_leaf_hashes(leaves)
    }

    /// Build a tree from raw identifier strings.
    ///
    /// Every identifier must be in canonical address form; the first one that
    /// is not aborts the build.
    pub fn from_strs<I, S>(identifiers: I) -> AllowlistResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let addresses = identifiers
            .into_iter()
            .enumerate()
            .map(|(index, s)| {
                let s = s.as_ref();
                Address::parse(s).map_err(|reason| AllowlistError::InvalidInput {
                    index,
                    value: s.to_string(),
                    reason,
                })
            })
            .collect::<AllowlistResult<Vec<_>>>()?;
        Ok(Self::build(addresses))
    }

    /// Build a tree from pre-computed leaf hashes (any order, duplicates allowed)
    pub fn from_leaf_hashes(mut leaves: Vec<Hash256>) -> Self {
        leaves.sort_unstable();
        leaves.dedup();

        if leaves.is_empty() {
            return Self {
                levels: Vec::new(),
                root: EMPTY_ROOT,
            };
        }

        let mut levels = vec![leaves];
        loop {
            let current = &levels[levels.len() - 1];
            if current.len() <= 1 {
                break;
            }
            let next: Vec<Hash256> = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => Hash256::hash_sorted_pair(left, right),
                    [odd] => *odd,
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                })
                .collect();
            levels.push(next);
        }

        let root = levels
            .last()
            .and_then(|top| top.first())
            .copied()
            .unwrap_or(EMPTY_ROOT);

        debug!(
            leaves = levels[0].len(),
            depth = levels.len() - 1,
            %root,
            "built allowlist tree"
        );

        Self { levels, root }
    }

    /// Get the root hash
    pub fn root(&self) -> Hash256 {
        self.root
    }

    /// Number of distinct leaves
    pub fn len(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of hashing levels above the leaves
    pub fn depth(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    /// Get all nodes at a specific level (0 = leaves)
    pub fn level(&self, level: usize) -> Option<&[Hash256]> {
        self.levels.get(level).map(Vec::as_slice)
    }

    /// Sorted leaf hashes
    pub fn leaves(&self) -> &[Hash256] {
        self.level(0).unwrap_or(&[])
    }

    /// Whether the address has a leaf in this tree
    pub fn contains(&self, address: &Address) -> bool {
        self.leaf_index(&address.leaf_hash()).is_some()
    }

    fn leaf_index(&self, leaf: &Hash256) -> Option<usize> {
        self.leaves().binary_search(leaf).ok()
    }

    /// Generate a membership proof for an address
    pub fn prove_membership(&self, address: &Address) -> AllowlistResult<MembershipProof> {
        let mut index = self
            .leaf_index(&address.leaf_hash())
            .ok_or(AllowlistError::NotFound(*address))?;

        let mut siblings = Vec::with_capacity(self.depth());
        for level in &self.levels[..self.depth()] {
            let sibling = index ^ 1;
            // A promoted odd node has no sibling and adds no step
            if let Some(node) = level.get(sibling) {
                siblings.push(*node);
            }
            index /= 2;
        }

        Ok(MembershipProof::new(siblings))
    }

    /// Export the leaf set and root for publishing alongside the contract
    pub fn export(&self) -> AllowlistExport {
        AllowlistExport {
            root: self.root,
            leaves: self.leaves().to_vec(),
        }
    }

    /// Rebuild a tree from an export, checking order and root
    pub fn import(export: &AllowlistExport) -> AllowlistResult<Self> {
        if let Some(pos) = export.leaves.windows(2).position(|w| w[0] >= w[1]) {
            return Err(AllowlistError::UnsortedLeaves(pos + 1));
        }
        let tree = Self::from_leaf_hashes(export.leaves.clone());
        if tree.root != export.root {
            return Err(AllowlistError::RootMismatch {
                expected: export.root,
                actual: tree.root,
            });
        }
        Ok(tree)
    }
}

/// Verify that `address` is in the tree with the given root.
///
/// Replays the proof from the address's leaf, sorting each pair before
/// hashing. Returns `false` on any mismatch; never panics.
pub fn verify(proof: &MembershipProof, address: &Address, root: &Hash256) -> bool {
    let computed = proof
        .siblings()
        .iter()
        .fold(address.leaf_hash(), |acc, sibling| {
            Hash256::hash_sorted_pair(&acc, sibling)
        });
    computed == *root
}

/// Serializable leaf set of an allowlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowlistExport {
    pub root: Hash256,
    pub leaves: Vec<Hash256>,
}
