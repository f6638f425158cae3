//! Error types for the short book store.
//!
//! Write-path errors (`RecordMismatch`, `Allocation`, `DuplicateKey`) are
//! always raised before any mutation, so the store is left untouched.

use thiserror::Error;

use crate::types::{Price, TradingPair};

pub type Result<T> = std::result::Result<T, BookError>;

/// Reasons an order entry's allocation bookkeeping is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("allocation length mismatch: {creators} creators, {amounts} amounts")]
    LengthMismatch { creators: usize, amounts: usize },
    #[error("allocations sum to {sum}, expected quantity {quantity}")]
    SumMismatch { quantity: Price, sum: Price },
    #[error("quantity {quantity} is negative")]
    NegativeQuantity { quantity: Price },
    #[error("allocation {index} has negative amount {amount}")]
    NegativeAmount { index: usize, amount: Price },
    #[error("allocation {index} has an empty creator")]
    EmptyCreator { index: usize },
    #[error("allocation sum is not exactly representable as a decimal")]
    Overflow,
}

#[derive(Debug, Error)]
pub enum BookError {
    #[error("no record for {pair} at price {price}")]
    NotFound { pair: TradingPair, price: String },
    #[error("record {field} mismatch: key has {expected}, record has {actual}")]
    RecordMismatch {
        field: &'static str,
        expected: String,
        actual: String,
    },
    #[error("allocation error: {0}")]
    Allocation(#[from] AllocationError),
    #[error("duplicate record for {pair} at price {price}")]
    DuplicateKey { pair: TradingPair, price: Price },
    #[error("malformed key: {reason}")]
    MalformedKey { reason: String },
    #[error("page limit must be greater than zero")]
    InvalidLimit,
    #[error("invalid denom {denom:?}: {reason}")]
    InvalidDenom { denom: String, reason: &'static str },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("unsupported genesis version {actual} (expected {expected})")]
    UnsupportedVersion { expected: u32, actual: u32 },
    #[error("genesis checksum mismatch: expected {expected}, computed {actual}")]
    ChecksumMismatch { expected: String, actual: String },
}

impl BookError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        BookError::MalformedKey {
            reason: reason.into(),
        }
    }

    /// True for the recoverable point-lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BookError::NotFound { .. })
    }
}
