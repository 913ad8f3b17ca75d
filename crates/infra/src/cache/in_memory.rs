use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use super::{CacheError, CachedResponse, ResponseCache};

/// Process-local cache for tests/dev, or when Redis is unreachable.
#[derive(Debug, Default)]
pub struct InMemoryResponseCache {
    inner: RwLock<HashMap<String, (Instant, CachedResponse)>>,
}

impl InMemoryResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl ResponseCache for InMemoryResponseCache {
    async fn get(&self, key: &str) -> Result<Option<CachedResponse>, CacheError> {
        let now = Instant::now();
        {
            let map = self
                .inner
                .read()
                .map_err(|e| CacheError::Backend(e.to_string()))?;
            match map.get(key) {
                Some((expires_at, value)) if *expires_at > now => return Ok(Some(value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: drop it so the map does not grow without bound.
        let mut map = self
            .inner
            .write()
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        if map.get(key).is_some_and(|(expires_at, _)| *expires_at <= now) {
            map.remove(key);
        }
        Ok(None)
    }

    async fn put(&self, key: &str, value: &CachedResponse, ttl: Duration) -> Result<(), CacheError> {
        let mut map = self
            .inner
            .write()
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        map.insert(key.to_string(), (Instant::now() + ttl, value.clone()));
        Ok(())
    }
}
