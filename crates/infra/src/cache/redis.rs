//! Redis-backed response cache.
//!
//! Values are stored as JSON strings with `SET .. EX`, so Redis handles expiry.

use std::time::Duration;

use ::redis::AsyncCommands;
use ::redis::aio::MultiplexedConnection;

use super::{CacheError, CachedResponse, ResponseCache};

#[derive(Clone)]
pub struct RedisResponseCache {
    conn: MultiplexedConnection,
}

impl RedisResponseCache {
    /// Open a multiplexed connection to `redis_url`.
    pub async fn connect(redis_url: impl AsRef<str>) -> Result<Self, CacheError> {
        let client = ::redis::Client::open(redis_url.as_ref())
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        Ok(Self { conn })
    }
}

impl core::fmt::Debug for RedisResponseCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RedisResponseCache").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl ResponseCache for RedisResponseCache {
    async fn get(&self, key: &str) -> Result<Option<CachedResponse>, CacheError> {
        let mut conn = self.conn.clone();
        let payload: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;

        payload
            .map(|p| serde_json::from_str(&p).map_err(|e| CacheError::Serialize(e.to_string())))
            .transpose()
    }

    async fn put(&self, key: &str, value: &CachedResponse, ttl: Duration) -> Result<(), CacheError> {
        let payload =
            serde_json::to_string(value).map_err(|e| CacheError::Serialize(e.to_string()))?;
        let seconds = ttl.as_secs().max(1);

        let mut conn = self.conn.clone();
        let _: () = ::redis::cmd("SET")
            .arg(key)
            .arg(payload)
            .arg("EX")
            .arg(seconds)
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        Ok(())
    }
}
