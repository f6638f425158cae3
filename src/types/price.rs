//! Exact decimal prices and quantities.
//!
//! ## Overview
//!
//! Every price, quantity and allocation amount in the book is a [`Price`]: a
//! thin wrapper around `rust_decimal::Decimal`. Comparison and equality are
//! by numeric value, so `1.0` and `1.00` are the same price level.
//!
//! ## Why Decimal?
//!
//! Floating-point arithmetic can produce different results on different
//! hardware, breaking determinism. Decimal arithmetic is exact within its
//! 96-bit mantissa and 28-digit scale. Parsing and sums refuse to round: a
//! string with more precision than fits is rejected, and a sum that would
//! drop fractional digits is treated like an overflow.
//!
//! ## Examples
//!
//! ```
//! use dex_shortbook::types::Price;
//!
//! let a: Price = "1.50".parse().unwrap();
//! let b: Price = "1.5".parse().unwrap();
//! assert_eq!(a, b);
//! assert!(Price::from(2) > a);
//! ```

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Maximum number of decimal places a price can carry.
pub const MAX_SCALE: u32 = 28;

/// An exact decimal value used for prices, quantities and allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero
    pub const ZERO: Price = Price(Decimal::ZERO);

    /// Wrap a decimal value
    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Parse a decimal string, returning `None` on any malformed input.
    ///
    /// # Example
    ///
    /// ```
    /// use dex_shortbook::types::Price;
    ///
    /// assert!(Price::parse("50000.12345678").is_some());
    /// assert!(Price::parse("not_found").is_none());
    /// assert!(Price::parse("").is_none());
    ///
    /// // more fractional digits than a decimal can hold
    /// assert!(Price::parse("1.00000000000000000000000000001").is_none());
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        s.trim().parse().ok()
    }

    /// The underlying decimal
    #[inline]
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Same value with trailing fractional zeros removed
    #[inline]
    pub fn normalized(&self) -> Self {
        Self(self.0.normalize())
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Strictly below zero (negative zero counts as zero)
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Add two values, `None` on overflow or if the exact sum needs more
    /// precision than a decimal holds.
    ///
    /// `Decimal::checked_add` only fails when the integer part overflows; when
    /// the mantissa is full it rounds away fractional digits instead. A sum is
    /// exact iff it kept every fractional digit either operand carries.
    pub fn checked_add(self, other: Price) -> Option<Price> {
        let sum = self.0.checked_add(other.0)?;
        let needed = self.normalized().0.scale().max(other.normalized().0.scale());
        (sum.scale() >= needed).then_some(Self(sum))
    }

    /// Sum an iterator of values, `None` on overflow or precision loss
    pub fn checked_sum<I>(values: I) -> Option<Price>
    where
        I: IntoIterator<Item = Price>,
    {
        values
            .into_iter()
            .try_fold(Price::ZERO, |acc, value| acc.checked_add(value))
    }
}

impl From<Decimal> for Price {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Price {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl From<Price> for Decimal {
    fn from(value: Price) -> Self {
        value.0
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    /// Exact parse: input that would need rounding is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str_exact(s).map(Self)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
