//! Checksummed genesis envelope.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::trace;

use super::GenesisState;
use crate::error::{BookError, Result};

/// Format version of [`GenesisPackage`].
pub const GENESIS_FORMAT_VERSION: u32 = 1;

/// A genesis state with a version tag and a SHA-256 checksum of its JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisPackage {
    pub version: u32,
    pub state: GenesisState,
    /// Hex-encoded SHA-256 of the serialized state
    pub checksum: String,
}

impl GenesisPackage {
    /// Wrap `state`, computing its checksum.
    pub fn new(state: GenesisState) -> Result<Self> {
        let checksum = Self::compute_checksum(&state)?;
        Ok(Self {
            version: GENESIS_FORMAT_VERSION,
            state,
            checksum,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Check the version and checksum.
    pub fn validate(&self) -> Result<()> {
        if self.version != GENESIS_FORMAT_VERSION {
            return Err(BookError::UnsupportedVersion {
                expected: GENESIS_FORMAT_VERSION,
                actual: self.version,
            });
        }
        let computed = Self::compute_checksum(&self.state)?;
        if computed != self.checksum {
            return Err(BookError::ChecksumMismatch {
                expected: self.checksum.clone(),
                actual: computed,
            });
        }
        Ok(())
    }

    /// Consume the package, returning the state once it validates.
    pub fn into_state(self) -> Result<GenesisState> {
        self.validate()?;
        Ok(self.state)
    }

    fn compute_checksum(state: &GenesisState) -> Result<String> {
        let payload = serde_json::to_vec(state)?;
        let mut hasher = Sha256::new();
        hasher.update(&payload);
        let checksum = hex::encode(hasher.finalize());
        trace!(records = state.len(), %checksum, "genesis checksum");
        Ok(checksum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Allocation, BookRecord, OrderEntry, Price, TradingPair};

    fn sample_state() -> GenesisState {
        let pair = TradingPair::new("USDC", "ATOM").unwrap();
        GenesisState::new(
            (1..=3)
                .map(|i| {
                    BookRecord::new(OrderEntry::new(
                        Price::from(i),
                        Price::from(i),
                        vec![Allocation::new("abc|c|", Price::from(i))],
                        &pair,
                    ))
                })
                .collect(),
        )
    }

    #[test]
    fn test_package_roundtrip_validates() {
        let package = GenesisPackage::new(sample_state()).unwrap();
        assert_eq!(package.checksum.len(), 64);

        let json = package.to_json().unwrap();
        let restored = GenesisPackage::from_json(&json).unwrap();
        assert_eq!(restored.into_state().unwrap(), sample_state());
    }

    #[test]
    fn test_package_detects_tampering() {
        let mut package = GenesisPackage::new(sample_state()).unwrap();
        package.state.short_book_list.pop();
        assert!(matches!(
            package.validate(),
            Err(BookError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_package_rejects_unknown_version() {
        let mut package = GenesisPackage::new(sample_state()).unwrap();
        package.version = GENESIS_FORMAT_VERSION + 1;
        assert!(matches!(
            package.into_state(),
            Err(BookError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            GenesisPackage::from_json("not json"),
            Err(BookError::Serialization(_))
        ));
    }
}
