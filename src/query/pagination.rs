//! Paged reads over one pair's records.
//!
//! ## Addressing Modes
//!
//! - **Cursor**: resume at [`PageRequest::key`], the composite key of the
//!   first unseen record as returned in the previous page's `next_key`.
//! - **Offset**: skip [`PageRequest::offset`] records from the start of the
//!   range. O(offset); meant for small books and tooling.
//!
//! When a request carries both, the cursor wins and the offset is ignored.
//!
//! ## Cursors
//!
//! A [`PageKey`] is the full storage key, not an iterator handle, so it stays
//! valid across restarts and answers identically on every node. It travels as
//! lowercase hex in JSON.
//!
//! ## Example
//!
//! ```
//! use dex_shortbook::orderbook::OrderBookStore;
//! use dex_shortbook::query::{paginate, PageRequest};
//! use dex_shortbook::types::{Allocation, BookRecord, OrderEntry, Price, TradingPair};
//! use dex_shortbook::BookConfig;
//!
//! let pair = TradingPair::new("USDC", "ATOM").unwrap();
//! let mut store = OrderBookStore::new();
//! for i in 1..=5 {
//!     let entry = OrderEntry::new(Price::from(i), Price::from(1),
//!         vec![Allocation::new("abc|c|", Price::from(1))], &pair);
//!     store.put(&pair, BookRecord::new(entry)).unwrap();
//! }
//!
//! let config = BookConfig::default();
//! let page = paginate(&store, &pair, &PageRequest::cursor(None, 2), &config).unwrap();
//! assert_eq!(page.records.len(), 2);
//!
//! let next = paginate(&store, &pair, &PageRequest::cursor(page.next_key, 2), &config).unwrap();
//! assert_eq!(next.records[0].price, Price::from(3));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BookConfig;
use crate::error::{BookError, Result};
use crate::orderbook::key::decode_key;
use crate::orderbook::OrderBookStore;
use crate::types::{BookRecord, TradingPair};

// ============================================================================
// PageKey
// ============================================================================

/// Opaque continuation cursor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PageKey(Vec<u8>);

impl PageKey {
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for PageKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for PageKey {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl FromStr for PageKey {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        hex::decode(s).map(Self)
    }
}

impl From<PageKey> for String {
    fn from(key: PageKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for PageKey {
    type Error = hex::FromHexError;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

// ============================================================================
// Request / Response
// ============================================================================

/// A list-query window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageRequest {
    /// Resume cursor; takes precedence over `offset`
    pub key: Option<PageKey>,
    /// Records to skip when no cursor is given
    pub offset: u64,
    /// Maximum records to return; must be non-zero
    pub limit: u64,
    /// Also return the exact number of records in the pair's range
    pub count_total: bool,
}

impl PageRequest {
    /// Offset-mode request
    pub fn offset(offset: u64, limit: u64) -> Self {
        Self {
            offset,
            limit,
            ..Self::default()
        }
    }

    /// Cursor-mode request; `None` starts at the beginning of the range
    pub fn cursor(key: Option<PageKey>, limit: u64) -> Self {
        Self {
            key,
            limit,
            ..Self::default()
        }
    }

    /// Ask for the total record count as well
    pub fn with_total(mut self) -> Self {
        self.count_total = true;
        self
    }
}

/// One window of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Records in ascending price order
    pub records: Vec<BookRecord>,
    /// Key of the first record after this window, `None` at end of range
    pub next_key: Option<PageKey>,
    /// Exact record count for the pair, if requested
    pub total: Option<u64>,
}

// ============================================================================
// Pagination
// ============================================================================

/// Read one page of `pair`'s records.
///
/// # Errors
///
/// - `InvalidLimit` if `request.limit` is zero (checked before any scan)
/// - `MalformedKey` if the cursor is not a key of `pair`, or a stored key
///   fails to decode back to its record's price
pub fn paginate(
    store: &OrderBookStore,
    pair: &TradingPair,
    request: &PageRequest,
    config: &BookConfig,
) -> Result<Page> {
    let limit = config.clamp_limit(request.limit);
    if limit == 0 {
        return Err(BookError::InvalidLimit);
    }
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let window_len = limit.saturating_add(1);

    let window: Vec<_> = match &request.key {
        Some(key) => {
            check_cursor(pair, key)?;
            store.range(pair, Some(key.as_bytes()))?.take(window_len).collect()
        }
        None => {
            let offset = usize::try_from(request.offset).unwrap_or(usize::MAX);
            store.range(pair, None)?.skip(offset).take(window_len).collect()
        }
    };

    let next_key = window.get(limit).map(|(key, _)| PageKey::from(*key));
    let mut records = Vec::with_capacity(window.len().min(limit));
    for (key, record) in window.into_iter().take(limit) {
        let (_, price) = decode_key(key)?;
        if price != record.price {
            return Err(BookError::malformed(format!(
                "key price {price} disagrees with record price {}",
                record.price
            )));
        }
        records.push(record.clone());
    }

    let total = request.count_total.then(|| store.count(pair) as u64);
    debug!(
        pair = %pair,
        cursor = request.key.is_some(),
        offset = request.offset,
        limit,
        returned = records.len(),
        more = next_key.is_some(),
        "short book page"
    );

    Ok(Page {
        records,
        next_key,
        total,
    })
}

/// A cursor must decode and belong to the requested pair.
fn check_cursor(pair: &TradingPair, key: &PageKey) -> Result<()> {
    let (cursor_pair, _) = decode_key(key.as_bytes())?;
    if cursor_pair != *pair {
        return Err(BookError::malformed(format!(
            "cursor belongs to {cursor_pair}, not {pair}"
        )));
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================
