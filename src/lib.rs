//! MintGate - Merkle allowlist proofs and mint orchestration
//!
//! Decides whether a wallet may mint at the whitelist price, produces the
//! Merkle membership proof the contract checks, and drives a mint attempt
//! from state read to confirmed receipt.
//!
//! # Crates
//!
//! - `mintgate-primitives`: Keccak hashes, checksummed addresses, wei amounts
//! - `mintgate-allowlist`: Sorted-pair Merkle tree, proofs, atomic rotation
//! - `mintgate-client`: Contract gateway trait and HTTP relay client
//! - `mintgate-orchestrator`: Mint attempt state machine
//!
//! # Example
//!
//! ```no_run
//! use mintgate::allowlist::{AllowlistHandle, AllowlistTree};
//! use mintgate::client::{GatewayConfig, HttpContractGateway};
//! use mintgate::orchestrator::{MintOrchestrator, OrchestratorConfig};
//! ```

pub use mintgate_allowlist as allowlist;
pub use mintgate_client as client;
pub use mintgate_orchestrator as orchestrator;
pub use mintgate_primitives as primitives;
