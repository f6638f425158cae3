//! Resting order payloads.
//!
//! ## Allocations
//!
//! A resting order's quantity is split across the accounts that contributed
//! capital to it. Each contribution is an [`Allocation`] (`creator`, `amount`)
//! so the pairing is structural. The external wire format still carries two
//! parallel arrays (`allocationCreator`, `allocation`); they are zipped on
//! deserialize and a length mismatch is rejected there.
//!
//! ## Serialization
//!
//! Records serialize to camelCase JSON with decimals as strings, which is the
//! shape genesis files and query responses use.

use serde::{Deserialize, Serialize};

use crate::error::{AllocationError, Result};
use crate::types::{Price, TradingPair};

// ============================================================================
// Allocation
// ============================================================================

/// One allocator's contribution to a resting order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Allocation {
    /// Allocator identifier (account or order reference)
    pub creator: String,

    /// Amount this allocator contributed
    pub amount: Price,
}

impl Allocation {
    pub fn new(creator: impl Into<String>, amount: Price) -> Self {
        Self {
            creator: creator.into(),
            amount,
        }
    }
}

// ============================================================================
// OrderEntry
// ============================================================================

/// The economic payload of a resting order.
///
/// ## Example
///
/// ```
/// use dex_shortbook::types::{Allocation, OrderEntry, Price, TradingPair};
///
/// let pair = TradingPair::new("USDC", "ATOM").unwrap();
/// let entry = OrderEntry::new(
///     Price::from(10),                          // price
///     Price::from(3),                           // quantity
///     vec![
///         Allocation::new("alice", Price::from(1)),
///         Allocation::new("bob", Price::from(2)),
///     ],
///     &pair,
/// );
/// assert_eq!(entry.total_allocated(), Some(Price::from(3)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OrderEntryWire", into = "OrderEntryWire")]
pub struct OrderEntry {
    /// Price level of the order; must equal the price it is keyed under
    pub price: Price,

    /// Quantity remaining on the book
    pub quantity: Price,

    /// Capital contributions, in allocator order
    pub allocations: Vec<Allocation>,

    pub price_denom: String,

    pub asset_denom: String,
}

impl OrderEntry {
    /// Create an entry for `pair`
    pub fn new(price: Price, quantity: Price, allocations: Vec<Allocation>, pair: &TradingPair) -> Self {
        Self {
            price,
            quantity,
            allocations,
            price_denom: pair.price_denom().to_string(),
            asset_denom: pair.asset_denom().to_string(),
        }
    }

    /// Create an entry from the parallel creator/amount arrays used on the wire.
    ///
    /// Fails with [`AllocationError::LengthMismatch`] when the arrays differ in length.
    pub fn from_parallel(
        price: Price,
        quantity: Price,
        creators: Vec<String>,
        amounts: Vec<Price>,
        pair: &TradingPair,
    ) -> std::result::Result<Self, AllocationError> {
        let allocations = zip_allocations(creators, amounts)?;
        Ok(Self::new(price, quantity, allocations, pair))
    }

    /// The pair named by this entry's denoms
    pub fn pair(&self) -> Result<TradingPair> {
        TradingPair::new(self.price_denom.clone(), self.asset_denom.clone())
    }

    /// Allocator identifiers in order
    pub fn creators(&self) -> impl Iterator<Item = &str> {
        self.allocations.iter().map(|a| a.creator.as_str())
    }

    /// Sum of all allocation amounts, `None` on overflow
    pub fn total_allocated(&self) -> Option<Price> {
        Price::checked_sum(self.allocations.iter().map(|a| a.amount))
    }
}

fn zip_allocations(
    creators: Vec<String>,
    amounts: Vec<Price>,
) -> std::result::Result<Vec<Allocation>, AllocationError> {
    if creators.len() != amounts.len() {
        return Err(AllocationError::LengthMismatch {
            creators: creators.len(),
            amounts: amounts.len(),
        });
    }
    Ok(creators
        .into_iter()
        .zip(amounts)
        .map(|(creator, amount)| Allocation { creator, amount })
        .collect())
}

/// Parallel-array wire shape of [`OrderEntry`].
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderEntryWire {
    price: Price,
    quantity: Price,
    #[serde(default)]
    allocation_creator: Vec<String>,
    #[serde(default)]
    allocation: Vec<Price>,
    price_denom: String,
    asset_denom: String,
}

impl TryFrom<OrderEntryWire> for OrderEntry {
    type Error = AllocationError;

    fn try_from(wire: OrderEntryWire) -> std::result::Result<Self, Self::Error> {
        Ok(OrderEntry {
            price: wire.price,
            quantity: wire.quantity,
            allocations: zip_allocations(wire.allocation_creator, wire.allocation)?,
            price_denom: wire.price_denom,
            asset_denom: wire.asset_denom,
        })
    }
}

impl From<OrderEntry> for OrderEntryWire {
    fn from(entry: OrderEntry) -> Self {
        let (allocation_creator, allocation): (Vec<String>, Vec<Price>) = entry
            .allocations
            .into_iter()
            .map(|a| (a.creator, a.amount))
            .unzip();
        OrderEntryWire {
            price: entry.price,
            quantity: entry.quantity,
            allocation_creator,
            allocation,
            price_denom: entry.price_denom,
            asset_denom: entry.asset_denom,
        }
    }
}

// ============================================================================
// BookRecord
// ============================================================================

/// One resting order at one price level of one pair (the short book role).
///
/// Identity is `(pair, price)`; the pair is carried by the entry's denoms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub price: Price,
    pub entry: OrderEntry,
}

impl BookRecord {
    /// Key the record at its entry's own price
    pub fn new(entry: OrderEntry) -> Self {
        Self {
            price: entry.price,
            entry,
        }
    }

    /// The pair this record belongs to
    pub fn pair(&self) -> Result<TradingPair> {
        self.entry.pair()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
