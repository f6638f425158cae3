//! Composite sort keys for book records.
//!
//! ## Layout
//!
//! ```text
//! "ShortBook-value-" | len(price_denom) | price_denom | len(asset_denom) | asset_denom | price
//! ```
//!
//! Denoms carry a one-byte length prefix, so the pair segment is
//! self-delimiting: no pair's prefix is a prefix of another pair's, and all
//! keys of one pair form a single contiguous run in byte order.
//!
//! ## Price encoding
//!
//! The price is a fixed-width [`PRICE_WIDTH`]-byte sign/exponent/digits code
//! whose byte order equals numeric order:
//!
//! ```text
//! sign (1) | exponent (1) | digits (29)
//! ```
//!
//! - sign: `0x00` negative, `0x01` zero, `0x02` positive
//! - exponent: decimal exponent of the leading digit, biased by 128
//! - digits: significant digits left-aligned and zero-padded
//!
//! For negative values the exponent and every digit are complemented so that
//! larger magnitudes sort first. Values are normalized before encoding, so
//! `1.0` and `1.00` produce the same key.

use rust_decimal::Decimal;

use crate::error::{BookError, Result};
use crate::types::price::MAX_SCALE;
use crate::types::{Price, TradingPair};

/// Store prefix for every short book key
pub const KEY_PREFIX: &[u8] = b"ShortBook-value-";

/// Digits in the largest decimal mantissa (2^96 - 1)
pub const PRICE_DIGITS: usize = 29;

/// Width of an encoded price in bytes
pub const PRICE_WIDTH: usize = 2 + PRICE_DIGITS;

const SIGN_NEGATIVE: u8 = 0x00;
const SIGN_ZERO: u8 = 0x01;
const SIGN_POSITIVE: u8 = 0x02;
const EXPONENT_BIAS: i32 = 128;

// ============================================================================
// Encoding
// ============================================================================

/// Key prefix shared by every record of `pair`.
pub fn pair_prefix(pair: &TradingPair) -> Vec<u8> {
    let price_denom = pair.price_denom().as_bytes();
    let asset_denom = pair.asset_denom().as_bytes();
    let mut prefix = Vec::with_capacity(KEY_PREFIX.len() + 2 + price_denom.len() + asset_denom.len());
    prefix.extend_from_slice(KEY_PREFIX);
    // Denom lengths are bounded by MAX_DENOM_LEN at pair construction
    prefix.push(price_denom.len() as u8);
    prefix.extend_from_slice(price_denom);
    prefix.push(asset_denom.len() as u8);
    prefix.extend_from_slice(asset_denom);
    prefix
}

/// Encode the full key for `(pair, price)`.
///
/// # Example
///
/// ```
/// use dex_shortbook::orderbook::key::{decode_key, encode_key};
/// use dex_shortbook::types::{Price, TradingPair};
///
/// let pair = TradingPair::new("USDC", "ATOM").unwrap();
/// let low = encode_key(&pair, Price::parse("9.5").unwrap());
/// let high = encode_key(&pair, Price::from(10));
/// assert!(low < high);
///
/// let (decoded_pair, price) = decode_key(&high).unwrap();
/// assert_eq!(decoded_pair, pair);
/// assert_eq!(price, Price::from(10));
/// ```
pub fn encode_key(pair: &TradingPair, price: Price) -> Vec<u8> {
    let mut key = pair_prefix(pair);
    key.extend_from_slice(&encode_price(price));
    key
}

/// Encode a price into its order-preserving fixed-width form.
pub fn encode_price(price: Price) -> [u8; PRICE_WIDTH] {
    let mut out = [0u8; PRICE_WIDTH];
    let value = price.normalized().as_decimal();
    if value.is_zero() {
        out[0] = SIGN_ZERO;
        return out;
    }

    let negative = value.is_sign_negative();
    let digits = value.mantissa().unsigned_abs().to_string();
    let exponent = digits.len() as i32 - 1 - value.scale() as i32;
    let biased = (exponent + EXPONENT_BIAS) as u8;

    out[0] = if negative { SIGN_NEGATIVE } else { SIGN_POSITIVE };
    out[1] = if negative { u8::MAX - biased } else { biased };
    for (slot, digit) in out[2..].iter_mut().zip(digits.bytes()) {
        *slot = digit - b'0';
    }
    if negative {
        for slot in out[2..].iter_mut() {
            *slot = 9 - *slot;
        }
    }
    out
}

// ============================================================================
// Decoding
// ============================================================================

/// Decode a key produced by [`encode_key`].
///
/// Fails with `MalformedKey` on any input `encode_key` could not have produced.
pub fn decode_key(key: &[u8]) -> Result<(TradingPair, Price)> {
    let rest = key
        .strip_prefix(KEY_PREFIX)
        .ok_or_else(|| BookError::malformed("missing short book prefix"))?;
    let (price_denom, rest) = read_denom(rest)?;
    let (asset_denom, rest) = read_denom(rest)?;
    let pair = TradingPair::new(price_denom, asset_denom)
        .map_err(|e| BookError::malformed(format!("invalid pair segment: {e}")))?;
    let price = decode_price(rest)?;
    Ok((pair, price))
}

fn read_denom(bytes: &[u8]) -> Result<(String, &[u8])> {
    let (&len, rest) = bytes
        .split_first()
        .ok_or_else(|| BookError::malformed("truncated pair segment"))?;
    let len = len as usize;
    if rest.len() < len {
        return Err(BookError::malformed("denom length exceeds key"));
    }
    let (denom, rest) = rest.split_at(len);
    let denom = std::str::from_utf8(denom)
        .map_err(|_| BookError::malformed("denom is not valid utf-8"))?;
    Ok((denom.to_string(), rest))
}

/// Decode a price produced by [`encode_price`].
pub fn decode_price(bytes: &[u8]) -> Result<Price> {
    if bytes.len() != PRICE_WIDTH {
        return Err(BookError::malformed(format!(
            "price segment is {} bytes, expected {}",
            bytes.len(),
            PRICE_WIDTH
        )));
    }
    if bytes[2..].iter().any(|&d| d > 9) {
        return Err(BookError::malformed("price digit out of range"));
    }

    let negative = match bytes[0] {
        SIGN_ZERO => {
            if bytes[1..].iter().any(|&b| b != 0) {
                return Err(BookError::malformed("non-canonical zero price"));
            }
            return Ok(Price::ZERO);
        }
        SIGN_NEGATIVE => true,
        SIGN_POSITIVE => false,
        other => {
            return Err(BookError::malformed(format!("unknown price sign byte {other:#04x}")));
        }
    };

    let biased = if negative { u8::MAX - bytes[1] } else { bytes[1] };
    let exponent = biased as i32 - EXPONENT_BIAS;
    let digits: Vec<u8> = bytes[2..]
        .iter()
        .map(|&d| if negative { 9 - d } else { d })
        .collect();
    let significant = digits.len() - digits.iter().rev().take_while(|&&d| d == 0).count();
    if significant == 0 || digits[0] == 0 {
        return Err(BookError::malformed("price digits are not normalized"));
    }

    let mut mantissa: i128 = 0;
    for &d in &digits[..significant] {
        mantissa = mantissa * 10 + d as i128;
    }
    let mut scale = significant as i32 - 1 - exponent;
    while scale < 0 {
        mantissa = mantissa
            .checked_mul(10)
            .ok_or_else(|| BookError::malformed("price exponent out of range"))?;
        scale += 1;
    }
    if scale as u32 > MAX_SCALE {
        return Err(BookError::malformed("price scale exceeds decimal precision"));
    }
    if negative {
        mantissa = -mantissa;
    }
    let value = Decimal::try_from_i128_with_scale(mantissa, scale as u32)
        .map_err(|e| BookError::malformed(format!("price out of decimal range: {e}")))?;

    let price = Price::new(value);
    if encode_price(price)[..] != bytes[..] {
        return Err(BookError::malformed("price encoding is not canonical"));
    }
    Ok(price)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn usdc_atom() -> TradingPair {
        TradingPair::new("USDC", "ATOM").unwrap()
    }

    fn p(s: &str) -> Price {
        Price::parse(s).unwrap()
    }

    #[test]
    fn test_price_order_matches_numeric_order() {
        let mut prices: Vec<Price> = [
            "-1000", "-10.5", "-10.25", "-1", "-0.001", "0", "0.0000001", "0.5", "1", "1.05", "9.99",
            "10", "10.01", "99", "100", "12345678901234567890",
        ]
        .iter()
        .map(|s| p(s))
        .collect();
        prices.reverse();

        let mut by_key = prices.clone();
        by_key.sort_by_key(|price| encode_price(*price));
        let mut by_value = prices;
        by_value.sort();
        assert_eq!(by_key, by_value);
    }

    #[test]
    fn test_extreme_values_roundtrip() {
        for value in [Decimal::MAX, Decimal::MIN, Decimal::new(1, 28), Decimal::new(-1, 28)] {
            let price = Price::new(value);
            assert_eq!(decode_price(&encode_price(price)).unwrap(), price);
        }
        assert!(encode_price(Price::new(Decimal::new(1, 28))) < encode_price(Price::new(Decimal::new(2, 28))));
        assert!(encode_price(Price::new(Decimal::MIN)) < encode_price(p("-1")));
    }

    #[test]
    fn test_scale_does_not_change_key() {
        let pair = usdc_atom();
        assert_eq!(encode_key(&pair, p("1.0")), encode_key(&pair, p("1.00")));
        assert_eq!(encode_key(&pair, p("1.0")), encode_key(&pair, p("1")));
        assert_eq!(encode_key(&pair, p("-0")), encode_key(&pair, p("0")));
    }

    #[test]
    fn test_decode_inverts_encode() {
        let pair = usdc_atom();
        for s in ["0", "1", "2.5", "-7.125", "0.0001", "500000000"] {
            let key = encode_key(&pair, p(s));
            let (decoded_pair, price) = decode_key(&key).unwrap();
            assert_eq!(decoded_pair, pair);
            assert_eq!(price, p(s));
        }
    }

    #[test]
    fn test_pairs_are_disjoint_and_contiguous() {
        // "AB"/"C" vs "A"/"BC" would collide under naive concatenation
        let left = TradingPair::new("AB", "C").unwrap();
        let right = TradingPair::new("A", "BC").unwrap();
        assert_ne!(pair_prefix(&left), pair_prefix(&right));

        let left_key = encode_key(&left, p("1"));
        assert!(left_key.starts_with(&pair_prefix(&left)));
        assert!(!left_key.starts_with(&pair_prefix(&right)));

        // Every key of `left` sorts on one side of every key of `right`
        let left_keys: Vec<_> = ["-5", "0", "7", "1000"].iter().map(|s| encode_key(&left, p(s))).collect();
        let right_keys: Vec<_> = ["-5", "0", "7", "1000"].iter().map(|s| encode_key(&right, p(s))).collect();
        let left_max = left_keys.iter().max().unwrap();
        let left_min = left_keys.iter().min().unwrap();
        assert!(right_keys.iter().all(|k| k > left_max) || right_keys.iter().all(|k| k < left_min));
    }

    #[test]
    fn test_decode_rejects_foreign_input() {
        assert!(matches!(decode_key(b""), Err(BookError::MalformedKey { .. })));
        assert!(matches!(decode_key(b"LongBook-value-xx"), Err(BookError::MalformedKey { .. })));

        let pair = usdc_atom();
        let key = encode_key(&pair, p("3"));
        assert!(decode_key(&key[..key.len() - 1]).is_err());

        let mut extended = key.clone();
        extended.push(0);
        assert!(decode_key(&extended).is_err());

        let mut bad_sign = key.clone();
        bad_sign[pair_prefix(&pair).len()] = 0x07;
        assert!(decode_key(&bad_sign).is_err());
    }

    #[test]
    fn test_decode_price_rejects_non_canonical() {
        let mut zero = encode_price(Price::ZERO);
        zero[5] = 1;
        assert!(decode_price(&zero).is_err());

        let mut leading_zero = encode_price(p("5"));
        leading_zero[2] = 0;
        assert!(decode_price(&leading_zero).is_err());

        let mut bad_digit = encode_price(p("5"));
        bad_digit[3] = 10;
        assert!(decode_price(&bad_digit).is_err());

        // exponent far outside the decimal range
        let mut huge = encode_price(p("5"));
        huge[1] = 250;
        assert!(decode_price(&huge).is_err());
    }
}
