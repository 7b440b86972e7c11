//! Fuzz target for membership proof verification
//!
//! This target ensures verification:
//! 1. Never panics on arbitrary proofs, addresses and roots
//! 2. Accepts every honestly generated proof
//! 3. Rejects a proof after any single sibling is altered

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mintgate_allowlist::{verify, AllowlistTree, MembershipProof};
use mintgate_primitives::{Address, Hash256};

#[derive(Debug, Arbitrary)]
struct RandomProof {
    address: [u8; 20],
    siblings: Vec<[u8; 32]>,
    root: [u8; 32],
}

#[derive(Debug, Arbitrary)]
struct TreeInput {
    members: Vec<[u8; 20]>,
    target: u8,
    tamper_step: u8,
    tamper_byte: u8,
}

#[derive(Debug, Arbitrary)]
enum FuzzInput {
    Random(RandomProof),
    Tree(TreeInput),
}

fuzz_target!(|input: FuzzInput| {
    match input {
        FuzzInput::Random(r) => {
            let Ok(address) = Address::from_bytes(r.address) else {
                return;
            };
            // Limit proof length to keep iterations fast
            let proof = MembershipProof::new(
                r.siblings.into_iter().take(64).map(Hash256::from_bytes).collect(),
            );
            let root = Hash256::from_bytes(r.root);

            // Verification should never panic and be deterministic
            let first = verify(&proof, &address, &root);
            let second = verify(&proof, &address, &root);
            assert_eq!(first, second);
        }
        FuzzInput::Tree(t) => {
            let members: Vec<Address> = t
                .members
                .into_iter()
                .take(256)
                .filter_map(|bytes| Address::from_bytes(bytes).ok())
                .collect();
            if members.is_empty() {
                return;
            }
            let tree = AllowlistTree::build(members.clone());
            let target = members[t.target as usize % members.len()];

            let proof = tree.prove_membership(&target).expect("member has a proof");
            assert!(verify(&proof, &target, &tree.root()));

            if proof.is_empty() || t.tamper_byte == 0 {
                return;
            }
            let mut siblings = proof.siblings().to_vec();
            let step = t.tamper_step as usize % siblings.len();
            siblings[step].0[0] ^= t.tamper_byte;
            assert!(!verify(&MembershipProof::new(siblings), &target, &tree.root()));
        }
    }
});
