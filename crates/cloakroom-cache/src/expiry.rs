//! Absolute-deadline bookkeeping for cache expiration.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// Expiration for a cache entry: an absolute instant, or a window from now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// The entry is invalid at and after the given instant.
    At(DateTime<Utc>),

    /// The entry is invalid this long after insertion.
    After(Duration),
}

impl Expiry {
    /// Resolve to an absolute deadline against the given "now".
    ///
    /// Windows too large to represent saturate to the far future rather
    /// than wrapping.
    pub fn deadline(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Expiry::At(instant) => instant,
            Expiry::After(window) => {
                let delta = TimeDelta::from_std(window).unwrap_or(TimeDelta::MAX);
                now.checked_add_signed(delta)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC)
            }
        }
    }
}

/// Tracks absolute deadlines for entries that expire by time.
///
/// Entries without a deadline have no record here; they never expire by
/// time and are only removed explicitly or under capacity pressure.
#[derive(Debug, Default)]
pub struct ExpiryTracker {
    /// Deadline for each tracked key.
    deadlines: HashMap<String, DateTime<Utc>>,
}

impl ExpiryTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self {
            deadlines: HashMap::new(),
        }
    }

    /// Record the deadline for a key, or clear it when `deadline` is `None`.
    pub fn set(&mut self, key: &str, deadline: Option<DateTime<Utc>>) {
        match deadline {
            Some(at) => {
                self.deadlines.insert(key.to_string(), at);
            }
            None => {
                self.deadlines.remove(key);
            }
        }
    }

    /// Check whether a key's deadline has passed.
    ///
    /// A key with no recorded deadline is never expired.
    pub fn is_expired(&self, key: &str, now: DateTime<Utc>) -> bool {
        match self.deadlines.get(key) {
            None => false,
            Some(at) => *at <= now,
        }
    }

    /// The recorded deadline for a key, if any.
    pub fn deadline(&self, key: &str) -> Option<DateTime<Utc>> {
        self.deadlines.get(key).copied()
    }

    /// Stop tracking a key.
    pub fn remove(&mut self, key: &str) {
        self.deadlines.remove(key);
    }

    /// Keys whose deadline has passed.
    pub fn expired(&self, now: DateTime<Utc>) -> Vec<String> {
        self.deadlines
            .iter()
            .filter(|(_, at)| **at <= now)
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Remove all expired records and return their keys.
    pub fn drain_expired(&mut self, now: DateTime<Utc>) -> Vec<String> {
        let expired = self.expired(now);
        for key in &expired {
            self.deadlines.remove(key);
        }
        expired
    }

    /// The tracked key with the soonest deadline.
    pub fn soonest(&self) -> Option<(&str, DateTime<Utc>)> {
        self.deadlines
            .iter()
            .min_by_key(|(_, at)| **at)
            .map(|(key, at)| (key.as_str(), *at))
    }

    /// Number of keys tracked for expiration.
    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    /// Check whether no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }

    /// Drop all tracking records.
    pub fn clear(&mut self) {
        self.deadlines.clear();
    }
}
