//! Short book record store.
//!
//! ## Architecture
//!
//! The store uses a hybrid data structure:
//!
//! - **Slab**: Pre-allocated record storage with O(1) insert/remove/lookup
//! - **BTreeMap**: Composite key (see [`key`](super::key)) to slab slot, kept in
//!   byte order so a pair's records form one ordered run
//!
//! ## Ordering
//!
//! Within a pair, records are ordered by ascending price. Different pairs
//! occupy disjoint key ranges, so range scans never cross a pair boundary.
//!
//! ## Concurrency
//!
//! Writes take `&mut self` and reads take `&self`. The host state machine
//! serializes its write phase; any reader holding `&OrderBookStore` observes
//! one consistent state for the whole call.
//!
//! ## Example
//!
//! ```
//! use dex_shortbook::orderbook::OrderBookStore;
//! use dex_shortbook::types::{Allocation, BookRecord, OrderEntry, Price, TradingPair};
//!
//! let pair = TradingPair::new("USDC", "ATOM").unwrap();
//! let mut store = OrderBookStore::with_capacity(100);
//!
//! let entry = OrderEntry::new(Price::from(5), Price::from(1),
//!     vec![Allocation::new("alice", Price::from(1))], &pair);
//! store.put(&pair, BookRecord::new(entry)).unwrap();
//!
//! assert_eq!(store.count(&pair), 1);
//! assert!(store.get(&pair, Price::from(5)).is_ok());
//! assert!(store.get(&pair, Price::from(6)).is_err());
//! ```

use std::collections::BTreeMap;
use std::ops::Bound;

use sha2::{Digest, Sha256};
use slab::Slab;
use tracing::{debug, trace};

use crate::config::BookConfig;
use crate::error::{BookError, Result};
use crate::orderbook::allocation::validate_allocations;
use crate::orderbook::key::{decode_key, encode_key, pair_prefix};
use crate::types::{BookRecord, Price, TradingPair};

/// Ordered, slab-backed mapping from composite key to book record.
#[derive(Debug, Default)]
pub struct OrderBookStore {
    /// Record storage
    /// Key: slab index, Value: BookRecord
    records: Slab<BookRecord>,

    /// Composite key to slab index, in byte order
    index: BTreeMap<Vec<u8>, usize>,
}

impl OrderBookStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with pre-allocated record slots
    ///
    /// # Example
    ///
    /// ```
    /// use dex_shortbook::orderbook::OrderBookStore;
    ///
    /// let store = OrderBookStore::with_capacity(10_000);
    /// assert!(store.capacity() >= 10_000);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Slab::with_capacity(capacity),
            index: BTreeMap::new(),
        }
    }

    /// Create a store sized by `config`
    pub fn from_config(config: &BookConfig) -> Self {
        Self::with_capacity(config.initial_capacity)
    }

    // ========================================================================
    // Capacity and Size
    // ========================================================================

    #[inline]
    pub fn capacity(&self) -> usize {
        self.records.capacity()
    }

    /// Total number of records across all pairs
    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Insert or replace the record at `(pair, record.price)`.
    ///
    /// The record is validated before anything is written:
    ///
    /// - `record.entry.price` must equal `record.price`
    /// - the entry's denoms must equal `pair`'s
    /// - allocations must sum exactly to the quantity
    ///
    /// # Returns
    ///
    /// The record previously stored at that key, if any
    pub fn put(&mut self, pair: &TradingPair, record: BookRecord) -> Result<Option<BookRecord>> {
        Self::check_record(pair, &record)?;

        let key = encode_key(pair, record.price);
        let replaced = match self.index.get(&key) {
            Some(&slot) => Some(std::mem::replace(&mut self.records[slot], record)),
            None => {
                let slot = self.records.insert(record);
                self.index.insert(key, slot);
                None
            }
        };
        debug!(pair = %pair, replaced = replaced.is_some(), "short book record written");
        Ok(replaced)
    }

    /// Check the key invariants and allocation bookkeeping of a record.
    pub fn check_record(pair: &TradingPair, record: &BookRecord) -> Result<()> {
        let entry = &record.entry;
        if entry.price != record.price {
            return Err(BookError::RecordMismatch {
                field: "price",
                expected: record.price.to_string(),
                actual: entry.price.to_string(),
            });
        }
        if entry.price_denom != pair.price_denom() {
            return Err(BookError::RecordMismatch {
                field: "price_denom",
                expected: pair.price_denom().to_string(),
                actual: entry.price_denom.clone(),
            });
        }
        if entry.asset_denom != pair.asset_denom() {
            return Err(BookError::RecordMismatch {
                field: "asset_denom",
                expected: pair.asset_denom().to_string(),
                actual: entry.asset_denom.clone(),
            });
        }
        validate_allocations(entry)?;
        Ok(())
    }

    /// Remove the record at `(pair, price)`.
    ///
    /// Removing an absent key is a no-op and returns `None`.
    pub fn delete(&mut self, pair: &TradingPair, price: Price) -> Option<BookRecord> {
        let key = encode_key(pair, price);
        let slot = self.index.remove(&key)?;
        debug!(pair = %pair, %price, "short book record deleted");
        Some(self.records.remove(slot))
    }

    /// Remove every record
    pub fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Point lookup
    pub fn get(&self, pair: &TradingPair, price: Price) -> Result<&BookRecord> {
        self.index
            .get(&encode_key(pair, price))
            .map(|&slot| &self.records[slot])
            .ok_or_else(|| BookError::NotFound {
                pair: pair.clone(),
                price: price.to_string(),
            })
    }

    #[inline]
    pub fn contains(&self, pair: &TradingPair, price: Price) -> bool {
        self.index.contains_key(&encode_key(pair, price))
    }

    /// Lazily walk `pair`'s records in key order, starting at `start` (inclusive)
    /// or at the first key of the pair.
    ///
    /// Fails with `MalformedKey` if `start` lies outside `pair`'s key range.
    pub fn range<'a>(
        &'a self,
        pair: &TradingPair,
        start: Option<&[u8]>,
    ) -> Result<impl Iterator<Item = (&'a [u8], &'a BookRecord)> + 'a> {
        let prefix = pair_prefix(pair);
        let from = match start {
            Some(start) if start.starts_with(&prefix) => start.to_vec(),
            Some(_) => return Err(BookError::malformed(format!("start key is outside the {pair} range"))),
            None => prefix.clone(),
        };
        let records = &self.records;
        let iter = self
            .index
            .range::<[u8], _>((Bound::Included(from.as_slice()), Bound::Unbounded))
            .take_while(move |(key, _)| key.starts_with(&prefix))
            .map(move |(key, &slot)| (key.as_slice(), &records[slot]));
        Ok(iter)
    }

    /// The next `count` entries of `pair` at or after `start`, in key order.
    ///
    /// Returns fewer than `count` entries only at the end of the pair's range.
    pub fn scan(
        &self,
        pair: &TradingPair,
        start: Option<&[u8]>,
        count: usize,
    ) -> Result<Vec<(Vec<u8>, BookRecord)>> {
        let entries: Vec<_> = self
            .range(pair, start)?
            .take(count)
            .map(|(key, record)| (key.to_vec(), record.clone()))
            .collect();
        trace!(pair = %pair, requested = count, returned = entries.len(), "scan");
        Ok(entries)
    }

    /// Number of records stored for `pair`
    pub fn count(&self, pair: &TradingPair) -> usize {
        let prefix = pair_prefix(pair);
        self.index
            .range::<[u8], _>((Bound::Included(prefix.as_slice()), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(&prefix))
            .count()
    }

    /// All `(key, record)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &BookRecord)> + '_ {
        self.index
            .iter()
            .map(|(key, &slot)| (key.as_slice(), &self.records[slot]))
    }

    /// Distinct pairs present in the store, in key order
    pub fn pairs(&self) -> Result<Vec<TradingPair>> {
        let mut pairs: Vec<TradingPair> = Vec::new();
        for key in self.index.keys() {
            let (pair, _) = decode_key(key)?;
            if pairs.last() != Some(&pair) {
                pairs.push(pair);
            }
        }
        Ok(pairs)
    }

    // ========================================================================
    // State Root
    // ========================================================================

    /// SHA-256 over every `(key, record)` in key order.
    ///
    /// Two stores holding the same records produce the same root regardless
    /// of the order the records were written in.
    pub fn state_root(&self) -> Result<[u8; 32]> {
        let mut hasher = Sha256::new();
        for (key, record) in self.iter() {
            let value = serde_json::to_vec(record)?;
            hasher.update((key.len() as u32).to_be_bytes());
            hasher.update(key);
            hasher.update((value.len() as u32).to_be_bytes());
            hasher.update(&value);
        }
        let mut root = [0u8; 32];
        root.copy_from_slice(&hasher.finalize());
        Ok(root)
    }

    /// The state root as a hex string
    pub fn state_root_hex(&self) -> Result<String> {
        self.state_root().map(hex::encode)
    }

    /// Insert under `key` with no checks, to simulate a corrupted index.
    #[cfg(test)]
    pub(crate) fn insert_raw(&mut self, key: Vec<u8>, record: BookRecord) {
        let slot = self.records.insert(record);
        self.index.insert(key, slot);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
