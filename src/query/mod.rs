//! Read path for query-serving collaborators.
//!
//! Requests arrive as plain strings and integers, already decoded from
//! whatever transport carried them. [`BookQuerier`] turns them into store
//! lookups and pages.
//!
//! An unparsable price in a point query is reported as `NotFound`, the same
//! outcome as a well-formed price with no record behind it.
//!
//! ## Example
//!
//! ```
//! use dex_shortbook::orderbook::OrderBookStore;
//! use dex_shortbook::query::{BookQuerier, QueryGetShortBookRequest};
//! use dex_shortbook::BookConfig;
//!
//! let store = OrderBookStore::new();
//! let config = BookConfig::default();
//! let querier = BookQuerier::new(&store, &config);
//!
//! let request = QueryGetShortBookRequest {
//!     price: "not_found".into(),
//!     price_denom: "USDC".into(),
//!     asset_denom: "ATOM".into(),
//! };
//! assert!(querier.short_book(&request).unwrap_err().is_not_found());
//! ```

pub mod pagination;

pub use pagination::{paginate, Page, PageKey, PageRequest};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::BookConfig;
use crate::error::{BookError, Result};
use crate::orderbook::OrderBookStore;
use crate::types::{BookRecord, Price, TradingPair};

/// Point query: one record by price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryGetShortBookRequest {
    pub price: String,
    pub price_denom: String,
    pub asset_denom: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryGetShortBookResponse {
    pub short_book: BookRecord,
}

/// List query: one page of a pair's records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryAllShortBookRequest {
    pub price_denom: String,
    pub asset_denom: String,
    #[serde(default)]
    pub pagination: Option<PageRequest>,
}

/// Continuation details of a list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub next_key: Option<PageKey>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryAllShortBookResponse {
    pub short_book: Vec<BookRecord>,
    pub pagination: PageResponse,
}

/// Serves point and list queries against a borrowed store.
#[derive(Debug, Clone, Copy)]
pub struct BookQuerier<'a> {
    store: &'a OrderBookStore,
    config: &'a BookConfig,
}

impl<'a> BookQuerier<'a> {
    pub fn new(store: &'a OrderBookStore, config: &'a BookConfig) -> Self {
        Self { store, config }
    }

    /// Look up the record at `(pair, price)`.
    pub fn short_book(&self, request: &QueryGetShortBookRequest) -> Result<QueryGetShortBookResponse> {
        let pair = TradingPair::new(request.price_denom.as_str(), request.asset_denom.as_str())?;
        let price = Price::parse(&request.price).ok_or_else(|| {
            trace!(price = %request.price, "unparsable price folded into not found");
            BookError::NotFound {
                pair: pair.clone(),
                price: request.price.clone(),
            }
        })?;
        let record = self.store.get(&pair, price)?;
        Ok(QueryGetShortBookResponse {
            short_book: record.clone(),
        })
    }

    /// Read one page of a pair's records.
    ///
    /// Without pagination, the first `default_page_limit` records are returned.
    pub fn short_book_all(&self, request: &QueryAllShortBookRequest) -> Result<QueryAllShortBookResponse> {
        let pair = TradingPair::new(request.price_denom.as_str(), request.asset_denom.as_str())?;
        let page_request = request
            .pagination
            .clone()
            .unwrap_or_else(|| PageRequest::offset(0, self.config.default_page_limit));
        let page = paginate(self.store, &pair, &page_request, self.config)?;
        Ok(QueryAllShortBookResponse {
            short_book: page.records,
            pagination: PageResponse {
                next_key: page.next_key,
                total: page.total,
            },
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
