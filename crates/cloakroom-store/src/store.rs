//! The session ticket store and its consumer-facing contract.

use async_trait::async_trait;
use tracing::{debug, trace};

use cloakroom_cache::{ExpiringCache, Expiry};

use crate::config::StoreConfig;
use crate::error::Result;
use crate::key;
use crate::ticket::TicketRecord;

/// Namespace prefix for every cache key owned by the store.
///
/// Keeps ticket entries apart from unrelated users of a shared cache.
/// Never part of the key handed to callers.
const KEY_PREFIX: &str = "auth_ticket:";

/// The contract between the store and the cookie-authentication layer.
///
/// Callers hold the session key returned by [`store`](TicketStore::store)
/// in the response cookie and present it on later requests. A miss on
/// [`retrieve`](TicketStore::retrieve) is `Ok(None)`, never an error, so
/// the caller falls through to its unauthenticated path without
/// special-casing failure.
///
/// The trait is async and fallible so a shared backend (e.g. a networked
/// key-value service) can stand in for the in-process implementation
/// without changing callers.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Persist a ticket under a freshly generated session key and
    /// return that key.
    async fn store(&self, ticket: TicketRecord) -> Result<String>;

    /// Replace the ticket and its expiration under an existing key.
    ///
    /// Succeeds even when the prior entry already expired or was
    /// evicted; renewing re-creates it.
    async fn renew(&self, key: &str, ticket: TicketRecord) -> Result<()>;

    /// Look up the ticket for a session key.
    ///
    /// `Ok(None)` when the key is unknown, expired, or evicted.
    async fn retrieve(&self, key: &str) -> Result<Option<TicketRecord>>;

    /// Drop the ticket for a session key. Removing an unknown key is a
    /// no-op.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-process ticket store over an [`ExpiringCache`].
///
/// The cache handle is injected at construction; clones of one handle
/// share state, so every request handler sees the same sessions. A
/// ticket's own expiration drives the cache deadline; without one, the
/// configured default window applies.
///
/// Sessions live in process memory only. A restart drops them all, and
/// a second instance sharing no state will not see them; substituting a
/// shared [`TicketStore`] implementation is the remedy, not a change to
/// callers.
#[derive(Clone)]
pub struct MemoryTicketStore {
    cache: ExpiringCache<TicketRecord>,
    config: StoreConfig,
}

impl MemoryTicketStore {
    /// Create a store over the given cache handle.
    pub fn new(cache: ExpiringCache<TicketRecord>, config: StoreConfig) -> Self {
        Self { cache, config }
    }

    fn prefixed(key: &str) -> String {
        format!("{KEY_PREFIX}{key}")
    }

    /// Expiration for a ticket: its own absolute instant, else the
    /// configured default window, else none (capacity eviction only).
    fn expiry_for(&self, ticket: &TicketRecord) -> Option<Expiry> {
        ticket
            .expires_at
            .map(Expiry::At)
            .or_else(|| self.config.default_ttl.map(Expiry::After))
    }
}

#[async_trait]
impl TicketStore for MemoryTicketStore {
    async fn store(&self, ticket: TicketRecord) -> Result<String> {
        let key = key::new_key();
        let expiry = self.expiry_for(&ticket);

        self.cache
            .insert(&Self::prefixed(&key), ticket, expiry)
            .await;

        debug!(key = %key, "Stored ticket");
        Ok(key)
    }

    async fn renew(&self, key: &str, ticket: TicketRecord) -> Result<()> {
        let expiry = self.expiry_for(&ticket);

        self.cache.insert(&Self::prefixed(key), ticket, expiry).await;

        debug!(key = %key, "Renewed ticket");
        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Option<TicketRecord>> {
        let ticket = self.cache.get(&Self::prefixed(key)).await;

        trace!(key = %key, found = ticket.is_some(), "Retrieved ticket");
        Ok(ticket)
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.cache.remove(&Self::prefixed(key)).await;

        debug!(key = %key, "Removed ticket");
        Ok(())
    }
}
