use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Externally visible identifier for an order.
///
/// Identifiers are assigned by the store at insert time and are opaque to
/// everything else. Generated identifiers look like `ORD-1a2b3c4d`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Prefix shared by all generated identifiers.
    pub const PREFIX: &'static str = "ORD-";

    /// Generates a fresh identifier from a random UUID.
    pub fn generate() -> Self {
        let simple = Uuid::new_v4().simple().to_string();
        Self(format!("{}{}", Self::PREFIX, &simple[..8]))
    }

    /// Wraps an existing identifier string without validation.
    ///
    /// Lookups by an identifier that was never issued simply find nothing.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the cache key under which this order's snapshot is stored.
    pub fn cache_key(&self) -> String {
        format!("order:{}", self.0)
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for OrderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_creates_unique_ids() {
        let id1 = OrderId::generate();
        let id2 = OrderId::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn generated_id_has_prefix_and_short_suffix() {
        let id = OrderId::generate();
        assert!(id.as_str().starts_with("ORD-"));
        assert_eq!(id.as_str().len(), 12);
    }

    #[test]
    fn cache_key_uses_order_namespace() {
        let id = OrderId::new("ORD-abc12345");
        assert_eq!(id.cache_key(), "order:ORD-abc12345");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = OrderId::new("ORD-abc12345");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ORD-abc12345\"");
    }
}
