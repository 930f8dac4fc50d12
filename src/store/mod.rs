//! Store Module
//!
//! Key-value backends that hold cached metadata documents. The proxy
//! only ever talks to the [`Store`] trait; the concrete backend is
//! chosen at startup.

mod memory;
mod redis;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

// == Store Error ==
/// Errors surfaced by a store backend.
///
/// A miss is a distinct variant so callers can branch on kind instead
/// of inspecting error message text.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Key is absent (or expired, which is treated the same)
    #[error("key not found: {0}")]
    NotFound(String),

    /// Any other backend failure (connectivity, protocol)
    #[error("store backend error: {0}")]
    Backend(String),
}

// == Store Trait ==
/// Operations the proxy requires from a key-value backend.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetches the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Stores `value` under `key`, expiring after `ttl`.
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), StoreError>;

    /// Enumerates every key starting with `prefix`. A finite snapshot;
    /// no pagination.
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// Removes `key`. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Liveness check against the backend.
    async fn health(&self) -> Result<(), StoreError>;
}
