//! Store and query configuration.

use serde::Deserialize;

pub const DEFAULT_INITIAL_CAPACITY: usize = 1_024;
pub const DEFAULT_PAGE_LIMIT: u64 = 100;
pub const DEFAULT_MAX_PAGE_LIMIT: u64 = 1_000;

/// Tunables for the book store and the paginated query path.
///
/// Deserializes from JSON with every field optional:
///
/// ```
/// use dex_shortbook::BookConfig;
///
/// let config: BookConfig = serde_json::from_str(r#"{"max_page_limit": 50}"#).unwrap();
/// assert_eq!(config.max_page_limit, 50);
/// assert_eq!(config.default_page_limit, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    /// Record slots pre-allocated by a new store
    pub initial_capacity: usize,
    /// Limit used when a list query carries no pagination
    pub default_page_limit: u64,
    /// Larger requested limits are clamped to this
    pub max_page_limit: u64,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            default_page_limit: DEFAULT_PAGE_LIMIT,
            max_page_limit: DEFAULT_MAX_PAGE_LIMIT,
        }
    }
}

impl BookConfig {
    /// Clamp a requested page limit to `max_page_limit`. Zero stays zero so
    /// the caller can reject it.
    pub fn clamp_limit(&self, limit: u64) -> u64 {
        limit.min(self.max_page_limit.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BookConfig::default();
        assert_eq!(config.initial_capacity, DEFAULT_INITIAL_CAPACITY);
        assert_eq!(config.default_page_limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(config.max_page_limit, DEFAULT_MAX_PAGE_LIMIT);
    }

    #[test]
    fn test_clamp_limit() {
        let config = BookConfig {
            max_page_limit: 10,
            ..BookConfig::default()
        };
        assert_eq!(config.clamp_limit(0), 0);
        assert_eq!(config.clamp_limit(5), 5);
        assert_eq!(config.clamp_limit(500), 10);
    }
}
