//! Type definitions for the contract gateway
//!
//! The ledger reports its state in loosely typed form (numbers, decimal
//! strings, or missing fields depending on the relay). [`RawContractState`]
//! accepts that shape and [`ContractSnapshot::try_from`] turns it into a
//! checked, typed snapshot at the boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use mintgate_allowlist::MembershipProof;
use mintgate_primitives::{Address, Hash256, Wei};

use crate::error::{GatewayError, Result};

/// Pricing and eligibility lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    Whitelist,
    Public,
}

impl Lane {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lane::Whitelist => "whitelist",
            Lane::Public => "public",
        }
    }
}

impl std::fmt::Display for Lane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contract state read at a single point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractSnapshot {
    pub current_supply: u64,
    pub total_supply: u64,
    pub whitelist_price: Wei,
    pub public_price: Wei,
    #[serde(rename = "baseURI")]
    pub base_uri: String,
    pub max_mint_per_wallet: u32,
}

impl ContractSnapshot {
    /// Price per unit for a lane
    pub fn price_for(&self, lane: Lane) -> Wei {
        match lane {
            Lane::Whitelist => self.whitelist_price,
            Lane::Public => self.public_price,
        }
    }

    /// Units left before the supply cap
    pub fn remaining_supply(&self) -> u64 {
        self.total_supply.saturating_sub(self.current_supply)
    }
}

/// Contract state as reported on the wire
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContractState {
    pub current_supply: Option<Value>,
    pub total_supply: Option<Value>,
    pub whitelist_price: Option<Value>,
    pub public_price: Option<Value>,
    #[serde(rename = "baseURI", alias = "baseUri")]
    pub base_uri: Option<Value>,
    #[serde(alias = "maxMint")]
    pub max_mint_per_wallet: Option<Value>,
}

impl TryFrom<RawContractState> for ContractSnapshot {
    type Error = GatewayError;

    fn try_from(raw: RawContractState) -> Result<Self> {
        let current_supply = integer_field("currentSupply", raw.current_supply.as_ref())?;
        let total_supply = integer_field("totalSupply", raw.total_supply.as_ref())?;
        let whitelist_price = wei_field("whitelistPrice", raw.whitelist_price.as_ref())?;
        let public_price = wei_field("publicPrice", raw.public_price.as_ref())?;
        let base_uri = match raw.base_uri {
            Some(Value::String(s)) => s,
            Some(Value::Null) | None => String::new(),
            Some(other) => {
                return Err(malformed("baseURI", format!("expected string, got {other}")))
            }
        };
        let max_mint = integer_field("maxMintPerWallet", raw.max_mint_per_wallet.as_ref())?;

        let max_mint_per_wallet = u32::try_from(max_mint)
            .map_err(|_| malformed("maxMintPerWallet", format!("{max_mint} exceeds u32")))?;
        if max_mint_per_wallet == 0 {
            return Err(malformed("maxMintPerWallet", "must be at least 1".into()));
        }
        if current_supply > total_supply {
            return Err(malformed(
                "currentSupply",
                format!("{current_supply} exceeds total supply {total_supply}"),
            ));
        }

        Ok(Self {
            current_supply,
            total_supply,
            whitelist_price,
            public_price,
            base_uri,
            max_mint_per_wallet,
        })
    }
}

fn malformed(field: &'static str, reason: String) -> GatewayError {
    GatewayError::MalformedState { field, reason }
}

fn decimal_u128(field: &'static str, value: Option<&Value>) -> Result<u128> {
    match value {
        None | Some(Value::Null) => Err(malformed(field, "missing".into())),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| malformed(field, format!("{n} is not a non-negative integer"))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u128>()
            .map_err(|e| malformed(field, format!("{s:?}: {e}"))),
        Some(other) => Err(malformed(field, format!("unexpected value {other}"))),
    }
}

fn integer_field(field: &'static str, value: Option<&Value>) -> Result<u64> {
    let n = decimal_u128(field, value)?;
    u64::try_from(n).map_err(|_| malformed(field, format!("{n} exceeds u64")))
}

fn wei_field(field: &'static str, value: Option<&Value>) -> Result<Wei> {
    decimal_u128(field, value).map(Wei)
}

/// A single mint attempt, created per request and discarded afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintRequest {
    pub attempt_id: Uuid,
    pub minter: Address,
    pub quantity: u32,
    pub lane: Lane,
    /// Total value to send: lane price × quantity
    pub cost: Wei,
    /// Present exactly when `lane` is [`Lane::Whitelist`]
    pub proof: Option<MembershipProof>,
}

impl MintRequest {
    /// Public-lane request
    pub fn public(minter: Address, quantity: u32, cost: Wei) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            minter,
            quantity,
            lane: Lane::Public,
            cost,
            proof: None,
        }
    }

    /// Whitelist-lane request carrying the membership proof
    pub fn whitelist(minter: Address, quantity: u32, cost: Wei, proof: MembershipProof) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            minter,
            quantity,
            lane: Lane::Whitelist,
            cost,
            proof: Some(proof),
        }
    }

    /// Tie the request to an existing attempt id
    pub fn with_attempt_id(mut self, attempt_id: Uuid) -> Self {
        self.attempt_id = attempt_id;
        self
    }
}

/// Handle to a dispatched transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxHandle {
    pub tx_hash: Hash256,
}

impl TxHandle {
    pub fn new(tx_hash: Hash256) -> Self {
        Self { tx_hash }
    }
}

/// Proof of inclusion for a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationReceipt {
    pub tx_hash: Hash256,
    pub block_number: u64,
    #[serde(default)]
    pub gas_used: Option<u64>,
}

/// Body posted to the relay to dispatch a mint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintSubmissionBody {
    pub attempt_id: Uuid,
    pub minter: Address,
    pub quantity: u32,
    /// Exact wei value, decimal string
    pub value: Wei,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<Vec<String>>,
}

impl From<&MintRequest> for MintSubmissionBody {
    fn from(request: &MintRequest) -> Self {
        Self {
            attempt_id: request.attempt_id,
            minter: request.minter,
            quantity: request.quantity,
            value: request.cost,
            proof: request.proof.as_ref().map(MembershipProof::to_hex_vec),
        }
    }
}

/// Relay status of a transaction receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

/// Receipt as reported by the relay
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub tx_hash: Hash256,
    pub block_number: u64,
    pub status: ReceiptStatus,
    #[serde(default)]
    pub gas_used: Option<u64>,
    #[serde(default)]
    pub revert_reason: Option<String>,
}

/// Structured error body returned by the relay
#[derive(Debug, Clone, Deserialize)]
pub struct RelayErrorBody {
    pub code: String,
    #[serde(default)]
    pub message: String,
}
