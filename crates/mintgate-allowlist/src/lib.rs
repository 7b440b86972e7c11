//! MintGate Allowlist
//!
//! Merkle membership proofs over a fixed set of account addresses.
//!
//! # Example
//!
//! ```
//! use mintgate_allowlist::{verify, AllowlistTree};
//! use mintgate_primitives::Address;
//!
//! let a: Address = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();
//! let b: Address = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359".parse().unwrap();
//!
//! let tree = AllowlistTree::build(vec![a, b]);
//! let proof = tree.prove_membership(&a).unwrap();
//!
//! assert!(verify(&proof, &a, &tree.root()));
//! assert!(!verify(&proof, &b, &tree.root()));
//! ```

pub mod error;
pub mod handle;
pub mod proof;
pub mod source;
pub mod tree;

pub use error::{AllowlistError, AllowlistResult};
pub use handle::AllowlistHandle;
pub use proof::MembershipProof;
pub use source::AllowlistSource;
pub use tree::{verify, AllowlistExport, AllowlistTree, EMPTY_ROOT};
