//! Allocation bookkeeping checks.
//!
//! A resting order's quantity must be exactly the sum of its allocations.
//! The sum uses [`Price::checked_add`](crate::types::Price::checked_add),
//! which fails rather than round, so there is no tolerance in either
//! direction.

use crate::error::AllocationError;
use crate::types::OrderEntry;

/// Validate an entry's allocations against its quantity.
///
/// # Errors
///
/// - [`AllocationError::NegativeQuantity`] if the quantity is below zero
/// - [`AllocationError::EmptyCreator`] / [`AllocationError::NegativeAmount`] for a bad allocation
/// - [`AllocationError::Overflow`] if the sum leaves the decimal range or
///   would lose fractional digits
/// - [`AllocationError::SumMismatch`] if the sum differs from the quantity
///
/// # Example
///
/// ```
/// use dex_shortbook::orderbook::validate_allocations;
/// use dex_shortbook::types::{Allocation, OrderEntry, Price, TradingPair};
///
/// let pair = TradingPair::new("USDC", "ATOM").unwrap();
/// let ok = OrderEntry::new(Price::from(1), Price::from(2),
///     vec![Allocation::new("a", Price::from(2))], &pair);
/// assert!(validate_allocations(&ok).is_ok());
///
/// let short = OrderEntry::new(Price::from(1), Price::from(3),
///     vec![Allocation::new("a", Price::from(2))], &pair);
/// assert!(validate_allocations(&short).is_err());
/// ```
pub fn validate_allocations(entry: &OrderEntry) -> Result<(), AllocationError> {
    if entry.quantity.is_negative() {
        return Err(AllocationError::NegativeQuantity {
            quantity: entry.quantity,
        });
    }

    for (index, allocation) in entry.allocations.iter().enumerate() {
        if allocation.creator.is_empty() {
            return Err(AllocationError::EmptyCreator { index });
        }
        if allocation.amount.is_negative() {
            return Err(AllocationError::NegativeAmount {
                index,
                amount: allocation.amount,
            });
        }
    }

    let sum = entry.total_allocated().ok_or(AllocationError::Overflow)?;
    if sum != entry.quantity {
        return Err(AllocationError::SumMismatch {
            quantity: entry.quantity,
            sum,
        });
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Allocation, Price, TradingPair};
    use rust_decimal::Decimal;

    fn entry(quantity: &str, allocations: &[(&str, &str)]) -> OrderEntry {
        let pair = TradingPair::new("USDC", "ATOM").unwrap();
        OrderEntry::new(
            Price::from(10),
            Price::parse(quantity).unwrap(),
            allocations
                .iter()
                .map(|(creator, amount)| Allocation::new(*creator, Price::parse(amount).unwrap()))
                .collect(),
            &pair,
        )
    }

    #[test]
    fn test_exact_sum_accepted() {
        assert!(validate_allocations(&entry("1.5", &[("a", "0.5"), ("b", "1.0")])).is_ok());
        assert!(validate_allocations(&entry("0.3", &[("a", "0.1"), ("b", "0.2")])).is_ok());
    }

    #[test]
    fn test_empty_allocations_only_for_zero_quantity() {
        assert!(validate_allocations(&entry("0", &[])).is_ok());
        assert_eq!(
            validate_allocations(&entry("1", &[])),
            Err(AllocationError::SumMismatch {
                quantity: Price::from(1),
                sum: Price::ZERO
            })
        );
    }

    #[test]
    fn test_surplus_and_shortfall_rejected() {
        assert!(matches!(
            validate_allocations(&entry("2", &[("a", "1"), ("b", "1.00000001")])),
            Err(AllocationError::SumMismatch { .. })
        ));
        assert!(matches!(
            validate_allocations(&entry("2", &[("a", "1")])),
            Err(AllocationError::SumMismatch { .. })
        ));
    }

    #[test]
    fn test_negative_values_rejected() {
        assert!(matches!(
            validate_allocations(&entry("-1", &[("a", "-1")])),
            Err(AllocationError::NegativeQuantity { .. })
        ));
        assert_eq!(
            validate_allocations(&entry("1", &[("a", "2"), ("b", "-1")])),
            Err(AllocationError::NegativeAmount {
                index: 1,
                amount: Price::from(-1)
            })
        );
    }

    #[test]
    fn test_empty_creator_rejected() {
        assert_eq!(
            validate_allocations(&entry("1", &[("a", "0.5"), ("", "0.5")])),
            Err(AllocationError::EmptyCreator { index: 1 })
        );
    }

    #[test]
    fn test_overflow_reported() {
        let mut e = entry("1", &[]);
        e.allocations = vec![
            Allocation::new("a", Price::new(Decimal::MAX)),
            Allocation::new("b", Price::new(Decimal::MAX)),
        ];
        assert_eq!(validate_allocations(&e), Err(AllocationError::Overflow));
    }

    #[test]
    fn test_surplus_hidden_by_rounding_rejected() {
        // 10^28 + 0.1 does not fit in a 96-bit mantissa at scale 1
        let e = entry(
            "10000000000000000000000000000",
            &[("a", "10000000000000000000000000000"), ("b", "0.1")],
        );
        assert_eq!(validate_allocations(&e), Err(AllocationError::Overflow));
    }
}
