//! Concurrent key-value cache with absolute expiration and bounded capacity.
//!
//! This crate provides the generic caching layer behind the session ticket
//! store:
//! - Per-entry absolute expiration, enforced lazily on read
//! - A hard capacity bound with expired-first eviction
//! - An optional background task that purges expired entries
//!
//! # Example
//!
//! ```rust,ignore
//! use cloakroom_cache::{CacheConfig, ExpiringCache, Expiry};
//!
//! let config = CacheConfig::default().with_capacity(10_000);
//! let cache: ExpiringCache<Vec<u8>> = ExpiringCache::new(config)?;
//!
//! cache.insert("key", value, Some(Expiry::After(Duration::from_secs(1800)))).await;
//! ```

mod cache;
mod config;
mod error;
mod expiry;

pub use cache::{CacheStats, ExpiringCache};
pub use config::CacheConfig;
pub use error::{Error, Result};
pub use expiry::{Expiry, ExpiryTracker};
