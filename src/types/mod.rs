//! Core data types for the short book.
//!
//! All types serialize with serde for genesis import/export and query
//! responses. All numeric values are exact decimals.
//!
//! ## Types
//!
//! - [`Price`]: Exact decimal (prices, quantities, allocation amounts)
//! - [`TradingPair`]: `(price_denom, asset_denom)` market identity
//! - [`Allocation`]: One allocator's contribution to an order
//! - [`OrderEntry`]: Resting order payload
//! - [`BookRecord`]: One resting order at one price level

mod order;
mod pair;
pub mod price;

pub use order::{Allocation, BookRecord, OrderEntry};
pub use pair::{validate_denom, TradingPair, MAX_DENOM_LEN};
pub use price::Price;
