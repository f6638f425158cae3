//! # DEX Short Book
//!
//! Resting-order book storage and deterministic paginated reads for a DEX
//! embedded in a replicated state machine.
//!
//! ## Architecture
//!
//! - **Types**: Core data structures (Price, TradingPair, OrderEntry, BookRecord)
//! - **OrderBook**: Composite keys, allocation checks and the record store
//! - **Query**: Offset and cursor pagination, point/list query handlers
//! - **Genesis**: Snapshot validation, import and export
//!
//! ## Design Principles
//!
//! 1. **Determinism**: Every node answers the same query with the same bytes
//! 2. **No Floating Point**: All prices and quantities are exact decimals
//! 3. **Order-Preserving Keys**: Byte order of keys is numeric price order
//! 4. **Synchronous Execution**: No async; the host serializes writes
//!
//! ## Example
//!
//! ```
//! use dex_shortbook::{BookConfig, OrderBookStore, PageRequest, paginate};
//! use dex_shortbook::types::{Allocation, BookRecord, OrderEntry, Price, TradingPair};
//!
//! let pair = TradingPair::new("USDC", "ATOM").unwrap();
//! let mut store = OrderBookStore::new();
//! for i in 1..=5 {
//!     let entry = OrderEntry::new(Price::from(i), Price::from(1),
//!         vec![Allocation::new("abc|c|", Price::from(1))], &pair);
//!     store.put(&pair, BookRecord::new(entry)).unwrap();
//! }
//!
//! let page = paginate(&store, &pair, &PageRequest::offset(0, 2).with_total(),
//!     &BookConfig::default()).unwrap();
//! assert_eq!(page.records.len(), 2);
//! assert_eq!(page.total, Some(5));
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Store and query configuration
pub mod config;

/// Error taxonomy
pub mod error;

/// Core data types: Price, TradingPair, OrderEntry, BookRecord
pub mod types;

/// Order book storage: keys, allocation checks, record store
pub mod orderbook;

/// Query path: pagination and request handlers
pub mod query;

/// Genesis snapshot validation, import and export
pub mod genesis;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::BookConfig;
pub use error::{AllocationError, BookError, Result};
pub use genesis::{export_genesis, import_genesis, validate_genesis, GenesisPackage, GenesisState};
pub use orderbook::OrderBookStore;
pub use query::{paginate, BookQuerier, Page, PageKey, PageRequest};
pub use types::{Allocation, BookRecord, OrderEntry, Price, TradingPair};
