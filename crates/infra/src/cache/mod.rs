//! TTL response cache used by the HTTP layer.
//!
//! Entries are opaque serialized responses keyed by a caller-built string
//! (method + path + query). Expiry is the only eviction policy.

pub mod in_memory;
#[cfg(feature = "redis")]
pub mod redis;

pub use in_memory::InMemoryResponseCache;
#[cfg(feature = "redis")]
pub use self::redis::RedisResponseCache;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
    #[error("cache entry could not be (de)serialized: {0}")]
    Serialize(String),
}

/// A response captured for replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[async_trait::async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<CachedResponse>, CacheError>;
    async fn put(&self, key: &str, value: &CachedResponse, ttl: Duration) -> Result<(), CacheError>;
}
