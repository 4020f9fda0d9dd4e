//! Key/value cache with per-entry TTL.
//!
//! The cache only ever accelerates reads; it is never the system of record.
//! Callers treat every cache failure as a miss or a skipped write.

pub mod error;
pub mod memory;
pub mod noop;
pub mod redis_cache;
pub mod store;

pub use error::{CacheError, Result};
pub use memory::InMemoryCache;
pub use noop::NoopCache;
pub use redis_cache::RedisCache;
pub use store::Cache;
