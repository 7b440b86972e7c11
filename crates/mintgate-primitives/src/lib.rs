//! MintGate Primitives
//!
//! Building blocks shared by the allowlist and the mint orchestrator:
//! - Keccak-256 digests ([`Hash256`]), the single hash used for leaves and nodes
//! - Account addresses ([`Address`]) with canonical-form and EIP-55 validation
//! - Exact wei amounts ([`Wei`]) for prices and mint costs

pub mod address;
pub mod amount;
pub mod hash;

pub use address::{Address, AddressError};
pub use amount::{AmountError, Wei, ETHER_DECIMALS};
pub use hash::Hash256;
