//! Short book storage.
//!
//! ## Components
//!
//! - [`key`]: Composite `(pair, price)` sort keys
//! - [`allocation`]: Allocation bookkeeping checks run on every write
//! - [`OrderBookStore`]: Ordered record store with point and range access
//!
//! ## Complexity
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | put / replace | O(log n) |
//! | get | O(log n) |
//! | delete | O(log n) |
//! | scan `k` entries | O(log n + k) |
//! | count(pair) | O(size of pair) |

pub mod allocation;
pub mod key;
pub mod store;

pub use allocation::validate_allocations;
pub use store::OrderBookStore;
