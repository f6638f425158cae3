//! Trading pair identity.
//!
//! A pair is `(price_denom, asset_denom)`. The components are compared
//! exactly: no case folding, trimming or reordering.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BookError, Result};

/// Longest denom accepted in a pair (bank-module denom limit).
pub const MAX_DENOM_LEN: usize = 128;

/// A market identified by its price and asset denominations.
///
/// ## Example
///
/// ```
/// use dex_shortbook::types::TradingPair;
///
/// let pair = TradingPair::new("USDC", "ATOM").unwrap();
/// assert_eq!(pair.price_denom(), "USDC");
/// assert_eq!(pair.to_string(), "USDC/ATOM");
/// assert!(TradingPair::new("", "ATOM").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPair", into = "RawPair")]
pub struct TradingPair {
    price_denom: String,
    asset_denom: String,
}

impl TradingPair {
    /// Build a pair, validating both denoms.
    pub fn new(price_denom: impl Into<String>, asset_denom: impl Into<String>) -> Result<Self> {
        let price_denom = price_denom.into();
        let asset_denom = asset_denom.into();
        validate_denom(&price_denom)?;
        validate_denom(&asset_denom)?;
        Ok(Self {
            price_denom,
            asset_denom,
        })
    }

    #[inline]
    pub fn price_denom(&self) -> &str {
        &self.price_denom
    }

    #[inline]
    pub fn asset_denom(&self) -> &str {
        &self.asset_denom
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.price_denom, self.asset_denom)
    }
}

/// Denoms must be non-empty and fit the one-byte length prefix of the key.
pub fn validate_denom(denom: &str) -> Result<()> {
    if denom.is_empty() {
        return Err(BookError::InvalidDenom {
            denom: denom.to_string(),
            reason: "denom is empty",
        });
    }
    if denom.len() > MAX_DENOM_LEN {
        return Err(BookError::InvalidDenom {
            denom: denom.to_string(),
            reason: "denom exceeds 128 bytes",
        });
    }
    Ok(())
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPair {
    price_denom: String,
    asset_denom: String,
}

impl TryFrom<RawPair> for TradingPair {
    type Error = BookError;

    fn try_from(raw: RawPair) -> Result<Self> {
        TradingPair::new(raw.price_denom, raw.asset_denom)
    }
}

impl From<TradingPair> for RawPair {
    fn from(pair: TradingPair) -> Self {
        RawPair {
            price_denom: pair.price_denom,
            asset_denom: pair.asset_denom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_equality_is_exact() {
        let a = TradingPair::new("USDC", "ATOM").unwrap();
        let b = TradingPair::new("USDC", "ATOM").unwrap();
        let reversed = TradingPair::new("ATOM", "USDC").unwrap();
        let lower = TradingPair::new("usdc", "ATOM").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, reversed);
        assert_ne!(a, lower);
    }

    #[test]
    fn test_pair_rejects_bad_denoms() {
        assert!(matches!(
            TradingPair::new("", "ATOM"),
            Err(BookError::InvalidDenom { .. })
        ));
        let long = "x".repeat(MAX_DENOM_LEN + 1);
        assert!(TradingPair::new("USDC", long).is_err());
        assert!(TradingPair::new("USDC", "x".repeat(MAX_DENOM_LEN)).is_ok());
    }

    #[test]
    fn test_pair_serde_validates() {
        let pair: TradingPair =
            serde_json::from_str(r#"{"priceDenom":"USDC","assetDenom":"ATOM"}"#).unwrap();
        assert_eq!(pair, TradingPair::new("USDC", "ATOM").unwrap());
        assert!(serde_json::from_str::<TradingPair>(r#"{"priceDenom":"","assetDenom":"ATOM"}"#).is_err());
    }
}
