//! Server-side session ticket store.
//!
//! Cookie authentication normally round-trips the whole serialized ticket
//! through the client. This crate keeps the ticket server-side instead:
//! the cookie carries only an opaque random key, the ticket lives in a
//! shared [`ExpiringCache`](cloakroom_cache::ExpiringCache), and the
//! server can revoke a session instantly by dropping its entry.
//!
//! The [`TicketStore`] trait is the contract the cookie-authentication
//! layer consumes; [`MemoryTicketStore`] is the in-process implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use cloakroom_cache::{CacheConfig, ExpiringCache};
//! use cloakroom_store::{MemoryTicketStore, StoreConfig, TicketRecord, TicketStore};
//!
//! let cache = ExpiringCache::new(CacheConfig::default())?;
//! let store = MemoryTicketStore::new(cache, StoreConfig::default());
//!
//! // On sign-in: the returned key goes into the response cookie.
//! let key = store.store(TicketRecord::new(claims_bytes)).await?;
//!
//! // On each request: a miss means the unauthenticated path.
//! let ticket = store.retrieve(&key).await?;
//! ```

mod config;
mod error;
mod key;
mod store;
mod ticket;

pub use config::StoreConfig;
pub use error::{Error, Result};
pub use key::new_key;
pub use store::{MemoryTicketStore, TicketStore};
pub use ticket::TicketRecord;
