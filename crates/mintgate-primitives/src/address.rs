//! Account addresses, the identifiers held in an allowlist
//!
//! An address is accepted only in canonical form: 40 hex characters with an
//! optional `0x` prefix. Mixed-case input must carry a valid EIP-55 checksum;
//! all-lowercase and all-uppercase input is accepted as-is. The zero address
//! is never a valid allowlist entry or mint recipient.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::hash::Hash256;

/// Errors produced while parsing an [`Address`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("Invalid address length: expected 40 hex chars, got {0}")]
    InvalidLength(usize),

    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Invalid EIP-55 checksum")]
    InvalidChecksum,

    #[error("Zero address not allowed")]
    ZeroAddress,
}

/// A 20-byte account address
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 20]);

impl Address {
    /// Wrap raw bytes. Fails for the zero address.
    pub fn from_bytes(bytes: [u8; 20]) -> Result<Self, AddressError> {
        if bytes == [0u8; 20] {
            return Err(AddressError::ZeroAddress);
        }
        Ok(Self(bytes))
    }

    /// Parse an address from a hex string, validating its canonical form.
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let trimmed = s.trim();
        let cleaned = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if cleaned.len() != 40 {
            return Err(AddressError::InvalidLength(cleaned.len()));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(cleaned, &mut bytes)
            .map_err(|e| AddressError::InvalidHex(e.to_string()))?;

        let has_lower = cleaned.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = cleaned.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && checksum_hex(&bytes) != cleaned {
            return Err(AddressError::InvalidChecksum);
        }

        Self::from_bytes(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// The Merkle leaf for this address: `keccak256(address_bytes)`
    pub fn leaf_hash(&self) -> Hash256 {
        Hash256::keccak256(&self.0)
    }

    /// EIP-55 checksummed form with `0x` prefix
    pub fn to_checksum(&self) -> String {
        format!("0x{}", checksum_hex(&self.0))
    }
}

/// EIP-55 mixed-case hex (no prefix) for 20 address bytes
fn checksum_hex(bytes: &[u8; 20]) -> String {
    let lower = hex::encode(bytes);
    let digest = Hash256::keccak256(lower.as_bytes());

    lower
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let byte = digest.0[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl serde::Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference vectors from EIP-55
    const CHECKSUMMED: [&str; 4] = [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[test]
    fn test_parse_address_with_prefix() {
        let addr = Address::parse("0x1234567890abcdef1234567890abcdef12345678").unwrap();
        assert_eq!(addr.as_bytes()[0], 0x12);
    }

    #[test]
    fn test_parse_address_without_prefix() {
        assert!(Address::parse("1234567890abcdef1234567890abcdef12345678").is_ok());
    }

    #[test]
    fn test_parse_address_invalid_length() {
        assert_eq!(
            Address::parse("0x1234"),
            Err(AddressError::InvalidLength(4))
        );
    }

    #[test]
    fn test_parse_address_invalid_hex() {
        let result = Address::parse("0xghijklmnopqrstuvwxyz1234567890abcdef1234");
        assert!(matches!(result, Err(AddressError::InvalidHex(_))));
    }

    #[test]
    fn test_parse_zero_address_rejected() {
        assert_eq!(
            Address::parse("0x0000000000000000000000000000000000000000"),
            Err(AddressError::ZeroAddress)
        );
    }

    #[test]
    fn test_eip55_vectors_roundtrip() {
        for s in CHECKSUMMED {
            let addr = Address::parse(s).unwrap();
            assert_eq!(addr.to_checksum(), s);
        }
    }

    #[test]
    fn test_eip55_bad_checksum_rejected() {
        // Flip the case of one letter in a valid checksummed address
        let bad = "0x5aaeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        assert_eq!(Address::parse(bad), Err(AddressError::InvalidChecksum));
    }

    #[test]
    fn test_single_case_accepted() {
        let lower = CHECKSUMMED[0].to_lowercase();
        let upper = format!("0x{}", CHECKSUMMED[0][2..].to_uppercase());
        assert_eq!(Address::parse(&lower), Address::parse(&upper));
    }

    #[test]
    fn test_leaf_hash_is_keccak_of_raw_bytes() {
        let addr = Address::parse(CHECKSUMMED[1]).unwrap();
        assert_eq!(addr.leaf_hash(), Hash256::keccak256(addr.as_bytes()));
    }
}
