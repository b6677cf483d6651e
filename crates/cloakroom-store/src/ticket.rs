//! The ticket record held on behalf of the authentication layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A serialized authentication ticket plus its session properties.
///
/// The principal payload is pass-through storage: the store never
/// inspects or deserializes it. Only the optional expiration is read,
/// to derive the cache deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    /// Serialized identity/claims payload, opaque to the store.
    pub principal: Vec<u8>,

    /// Instant after which the ticket is invalid. `None` means the
    /// authentication layer supplied no explicit expiration.
    pub expires_at: Option<DateTime<Utc>>,
}

impl TicketRecord {
    /// Create a ticket with no explicit expiration.
    pub fn new(principal: impl Into<Vec<u8>>) -> Self {
        Self {
            principal: principal.into(),
            expires_at: None,
        }
    }

    /// Set the absolute expiration.
    pub fn with_expires_at(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }
}
