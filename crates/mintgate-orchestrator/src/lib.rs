//! MintGate Orchestrator
//!
//! Drives a mint attempt from request to settlement: reads live contract
//! state, decides the pricing lane from allowlist membership, prices the
//! request, submits it and returns the refreshed state.
//!
//! # Example
//!
//! ```no_run
//! use mintgate_allowlist::{AllowlistHandle, AllowlistTree};
//! use mintgate_client::{GatewayConfig, HttpContractGateway};
//! use mintgate_orchestrator::{MintOrchestrator, MintOutcome, OrchestratorConfig};
//! use mintgate_primitives::Address;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let wallet: Address = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse()?;
//!     let allowlist = AllowlistHandle::new(AllowlistTree::build(vec![wallet]));
//!     let gateway = HttpContractGateway::try_new(GatewayConfig::local())?;
//!     let orchestrator = MintOrchestrator::new(gateway, allowlist, OrchestratorConfig::default());
//!
//!     match orchestrator.request_mint(wallet, 2).await {
//!         MintOutcome::Settled(s) => println!("new supply: {}", s.new_supply()),
//!         MintOutcome::Failed(f) => println!("failed ({:?}): {}", f.retry_safety(), f),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Cancellation
//!
//! A [`CancelSignal`] stops an attempt at any point before the mint is
//! submitted. Once submitted the transaction cannot be recalled, so the
//! signal is ignored from `SubmittingMint` onwards.

mod cancel;
mod config;
mod error;
mod inflight;
mod orchestrator;
mod state;

pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use config::OrchestratorConfig;
pub use error::{MintFailure, RetrySafety};
pub use orchestrator::{MintOrchestrator, MintOutcome, MintSettlement};
pub use state::MintState;
