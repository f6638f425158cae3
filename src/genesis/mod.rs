//! Bulk import and export of the short book.
//!
//! ## Loading
//!
//! [`import_genesis`] is all-or-nothing: the whole snapshot is checked for
//! duplicate `(pair, price)` keys and every record is validated before the
//! first write. A rejected snapshot leaves the store exactly as it was.
//!
//! ## Export
//!
//! [`export_genesis`] and [`export_pair`] emit records in key order, so the
//! same store always exports the same bytes.

mod package;

pub use package::{GenesisPackage, GENESIS_FORMAT_VERSION};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{BookError, Result};
use crate::orderbook::key::encode_key;
use crate::orderbook::OrderBookStore;
use crate::types::{BookRecord, TradingPair};

/// The short book section of a genesis file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenesisState {
    #[serde(default)]
    pub short_book_list: Vec<BookRecord>,
}

impl GenesisState {
    pub fn new(short_book_list: Vec<BookRecord>) -> Self {
        Self { short_book_list }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.short_book_list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.short_book_list.is_empty()
    }
}

/// Check that no two records share a `(pair, price)` key.
///
/// Prices are compared by value, so `1.0` and `1.00` under the same pair are
/// duplicates. Fails on the first repeat.
pub fn validate_genesis(state: &GenesisState) -> Result<()> {
    let mut seen: HashSet<Vec<u8>> = HashSet::with_capacity(state.len());
    for record in &state.short_book_list {
        let pair = record.pair()?;
        if !seen.insert(encode_key(&pair, record.price)) {
            warn!(pair = %pair, price = %record.price, "duplicate short book record in genesis");
            return Err(BookError::DuplicateKey {
                pair,
                price: record.price,
            });
        }
    }
    Ok(())
}

/// Validate `state` in full, then write every record into `store`.
///
/// # Returns
///
/// Number of records written
pub fn import_genesis(store: &mut OrderBookStore, state: &GenesisState) -> Result<usize> {
    validate_genesis(state)?;

    let mut keyed: Vec<(TradingPair, &BookRecord)> = Vec::with_capacity(state.len());
    for record in &state.short_book_list {
        let pair = record.pair()?;
        OrderBookStore::check_record(&pair, record)?;
        keyed.push((pair, record));
    }

    for (pair, record) in keyed {
        store.put(&pair, record.clone())?;
    }
    info!(records = state.len(), "short book genesis imported");
    Ok(state.len())
}

/// Every record in the store, in key order.
pub fn export_genesis(store: &OrderBookStore) -> GenesisState {
    GenesisState::new(store.iter().map(|(_, record)| record.clone()).collect())
}

/// One pair's records, in price order.
pub fn export_pair(store: &OrderBookStore, pair: &TradingPair) -> Result<GenesisState> {
    let records = store.range(pair, None)?.map(|(_, record)| record.clone()).collect();
    Ok(GenesisState::new(records))
}

// ============================================================================
// Unit Tests
// ============================================================================
