use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::{Cache, CacheError, Result};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct FailureSwitches {
    get: AtomicBool,
    set: AtomicBool,
    delete: AtomicBool,
}

/// In-memory cache with TTL expiry.
///
/// Used when no Redis URL is configured and in tests. Expiry is evaluated
/// lazily on read against the tokio clock, so paused-time tests can advance
/// past a TTL deterministically.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    fail: Arc<FailureSwitches>,
}

impl InMemoryCache {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a live (unexpired) entry exists for `key`.
    pub async fn contains(&self, key: &str) -> bool {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .is_some_and(|e| e.expires_at > Instant::now())
    }

    /// Returns the number of stored entries, including expired ones not yet evicted.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Configures `get` to fail.
    pub fn set_fail_on_get(&self, fail: bool) {
        self.fail.get.store(fail, Ordering::SeqCst);
    }

    /// Configures `set` to fail.
    pub fn set_fail_on_set(&self, fail: bool) {
        self.fail.set.store(fail, Ordering::SeqCst);
    }

    /// Configures `delete` to fail.
    pub fn set_fail_on_delete(&self, fail: bool) {
        self.fail.delete.store(fail, Ordering::SeqCst);
    }

    fn check(flag: &AtomicBool, op: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable(format!("{op} disabled")));
        }
        Ok(())
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Self::check(&self.fail.get, "get")?;

        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        // Expired: evict unless it was refreshed in the meantime
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| e.expires_at <= now) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        Self::check(&self.fail.set, "set")?;

        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        Self::check(&self.fail.delete, "delete")?;

        self.entries.write().await.remove(key);
        Ok(())
    }
}
