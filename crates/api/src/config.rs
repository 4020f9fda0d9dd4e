//! Application configuration loaded from environment variables.

use std::time::Duration;

use domain::OrderServiceConfig;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT` — `text` or `json` (default: `text`)
/// - `DATABASE_URL` — PostgreSQL URL; in-memory store when unset
/// - `DATABASE_MAX_CONNECTIONS` — pool size (default: `10`)
/// - `REDIS_URL` — Redis URL; in-memory cache when unset
/// - `CACHE_ENABLED` — `false` disables caching entirely (default: `true`)
/// - `CACHE_TTL_SECS` — lifetime of cached orders (default: `60`)
/// - `KAFKA_BROKERS` — bootstrap servers; in-memory notifier when unset
/// - `KAFKA_TOPIC` — status-change topic (default: `"order_events"`)
/// - `KAFKA_MESSAGE_TIMEOUT_MS` — delivery timeout (default: `5000`)
/// - `MAX_PAGE_LIMIT` — largest accepted list page size (default: `100`)
/// - `REQUEST_TIMEOUT_SECS` — per-request deadline (default: `30`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub redis_url: Option<String>,
    pub cache_enabled: bool,
    pub cache_ttl: Duration,
    pub kafka_brokers: Option<String>,
    pub kafka_topic: String,
    pub kafka_message_timeout: Duration,
    pub max_page_limit: u32,
    pub request_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup. Unparseable values
    /// fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let parsed = |key: &str| non_empty(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            host: non_empty("HOST").unwrap_or(defaults.host),
            port: non_empty("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: non_empty("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: match non_empty("LOG_FORMAT") {
                Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
            database_url: non_empty("DATABASE_URL"),
            database_max_connections: non_empty("DATABASE_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.database_max_connections),
            redis_url: non_empty("REDIS_URL"),
            cache_enabled: non_empty("CACHE_ENABLED")
                .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "false" | "0" | "no" | "off"))
                .unwrap_or(defaults.cache_enabled),
            cache_ttl: parsed("CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            kafka_brokers: non_empty("KAFKA_BROKERS"),
            kafka_topic: non_empty("KAFKA_TOPIC").unwrap_or(defaults.kafka_topic),
            kafka_message_timeout: parsed("KAFKA_MESSAGE_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.kafka_message_timeout),
            max_page_limit: non_empty("MAX_PAGE_LIMIT")
                .and_then(|v| v.parse().ok())
                .filter(|limit| *limit > 0)
                .unwrap_or(defaults.max_page_limit),
            request_timeout: parsed("REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Settings handed to the order service.
    pub fn service_config(&self) -> OrderServiceConfig {
        OrderServiceConfig {
            cache_ttl: self.cache_ttl,
            max_page_limit: self.max_page_limit,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            database_url: None,
            database_max_connections: 10,
            redis_url: None,
            cache_enabled: true,
            cache_ttl: Duration::from_secs(60),
            kafka_brokers: None,
            kafka_topic: "order_events".to_string(),
            kafka_message_timeout: Duration::from_millis(5000),
            max_page_limit: 100,
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.database_url.is_none());
        assert!(config.cache_enabled);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.kafka_topic, "order_events");
        assert_eq!(config.max_page_limit, 100);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        let config = from_pairs(&[]);
        assert_eq!(config.addr(), "0.0.0.0:3000");
        assert!(config.redis_url.is_none());
        assert!(config.kafka_brokers.is_none());
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.kafka_message_timeout, Duration::from_millis(5000));
    }

    #[test]
    fn test_reads_overrides() {
        let config = from_pairs(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("LOG_FORMAT", "JSON"),
            ("DATABASE_URL", "postgres://localhost/orders"),
            ("REDIS_URL", "redis://localhost:6379"),
            ("CACHE_TTL_SECS", "120"),
            ("KAFKA_BROKERS", "localhost:9092"),
            ("KAFKA_TOPIC", "orders"),
            ("MAX_PAGE_LIMIT", "50"),
            ("REQUEST_TIMEOUT_SECS", "5"),
        ]);

        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/orders")
        );
        assert_eq!(config.redis_url.as_deref(), Some("redis://localhost:6379"));
        assert_eq!(config.kafka_brokers.as_deref(), Some("localhost:9092"));
        assert_eq!(config.kafka_topic, "orders");
        assert_eq!(config.request_timeout, Duration::from_secs(5));

        let service = config.service_config();
        assert_eq!(service.cache_ttl, Duration::from_secs(120));
        assert_eq!(service.max_page_limit, 50);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = from_pairs(&[
            ("PORT", "not-a-port"),
            ("CACHE_TTL_SECS", "-1"),
            ("MAX_PAGE_LIMIT", "0"),
            ("DATABASE_URL", "  "),
        ]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.max_page_limit, 100);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_cache_can_be_disabled() {
        assert!(!from_pairs(&[("CACHE_ENABLED", "false")]).cache_enabled);
        assert!(!from_pairs(&[("CACHE_ENABLED", "0")]).cache_enabled);
        assert!(from_pairs(&[("CACHE_ENABLED", "true")]).cache_enabled);
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }
}
