//! MintGate Client
//!
//! The contract gateway: a typed view of the mint contract's state and the
//! calls that dispatch and confirm mints.
//!
//! # Example
//!
//! ```no_run
//! use mintgate_client::{ContractGateway, GatewayConfig, HttpContractGateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = HttpContractGateway::try_new(GatewayConfig::local())?;
//!
//!     let state = gateway.read_state().await?;
//!     println!("Minted {} / {}", state.current_supply, state.total_supply);
//!     Ok(())
//! }
//! ```
//!
//! # Feature Flags
//!
//! - `test-utils` - Export `MockContractGateway` generated by mockall

mod error;
mod gateway;
mod http;
mod types;

pub use error::{GatewayError, Result, SubmitRejection};
pub use gateway::ContractGateway;
#[cfg(any(test, feature = "test-utils"))]
pub use gateway::MockContractGateway;
pub use http::{GatewayConfig, HttpContractGateway};
pub use types::*;
