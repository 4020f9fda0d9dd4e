use std::time::Duration;

use async_trait::async_trait;

use crate::{Cache, Result};

/// A cache that stores nothing. Every read misses and every write succeeds.
///
/// Wired in when caching is disabled by configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl Cache for NoopCache {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}
