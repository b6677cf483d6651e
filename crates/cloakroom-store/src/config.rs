//! Configuration for the session ticket store.

use std::time::Duration;

/// Default sliding window applied to tickets that carry no expiration.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Configuration for the session ticket store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Fallback time-to-live for tickets without an explicit expiration.
    /// `None` leaves such tickets time-unbounded; they remain subject to
    /// capacity eviction.
    pub default_ttl: Option<Duration>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_ttl: Some(DEFAULT_TTL),
        }
    }
}

impl StoreConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback time-to-live.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Disable the fallback window. Tickets without an expiration then
    /// stay until removed or evicted under capacity pressure.
    pub fn without_default_ttl(mut self) -> Self {
        self.default_ttl = None;
        self
    }
}
