//! Native-currency amounts in wei
//!
//! Prices are held as exact integers so that `price × quantity` is never
//! subject to floating point rounding.

use std::fmt;

use thiserror::Error;

/// Number of decimals between wei and ether
pub const ETHER_DECIMALS: u32 = 18;

const WEI_PER_ETHER: u128 = 10u128.pow(ETHER_DECIMALS);

/// Errors produced while parsing an ether amount
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Empty amount")]
    Empty,

    #[error("Invalid amount {0:?}")]
    Invalid(String),

    #[error("Too many decimal places in {0:?} (max 18)")]
    TooPrecise(String),

    #[error("Amount overflows u128")]
    Overflow,
}

/// An amount of wei
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Wei(pub u128);

impl Wei {
    pub const ZERO: Wei = Wei(0);

    pub fn new(wei: u128) -> Self {
        Self(wei)
    }

    pub fn as_u128(&self) -> u128 {
        self.0
    }

    /// Multiply by a quantity, `None` on overflow
    pub fn checked_mul(self, quantity: u64) -> Option<Wei> {
        self.0.checked_mul(u128::from(quantity)).map(Wei)
    }

    /// Parse a decimal ether string such as `"0.8"` or `"12"`.
    pub fn parse_ether(s: &str) -> Result<Wei, AmountError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AmountError::Empty);
        }

        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(AmountError::Invalid(s.to_string()));
        }
        let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(AmountError::Invalid(s.to_string()));
        }
        if frac_part.len() > ETHER_DECIMALS as usize {
            return Err(AmountError::TooPrecise(s.to_string()));
        }

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| AmountError::Overflow)?
        };
        let mut frac: u128 = if frac_part.is_empty() {
            0
        } else {
            frac_part.parse().map_err(|_| AmountError::Overflow)?
        };
        frac *= 10u128.pow(ETHER_DECIMALS - frac_part.len() as u32);

        whole
            .checked_mul(WEI_PER_ETHER)
            .and_then(|w| w.checked_add(frac))
            .map(Wei)
            .ok_or(AmountError::Overflow)
    }

    /// Format as a decimal ether string without trailing zeros
    pub fn format_ether(&self) -> String {
        let whole = self.0 / WEI_PER_ETHER;
        let frac = self.0 % WEI_PER_ETHER;
        if frac == 0 {
            return whole.to_string();
        }
        let frac = format!("{:018}", frac);
        format!("{}.{}", whole, frac.trim_end_matches('0'))
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ETH", self.format_ether())
    }
}

impl From<u128> for Wei {
    fn from(wei: u128) -> Self {
        Self(wei)
    }
}

// Decimal string on the wire: u128 does not fit in a JSON number.
impl serde::Serialize for Wei {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Wei {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<u128>().map(Wei).map_err(serde::de::Error::custom)
    }
}
