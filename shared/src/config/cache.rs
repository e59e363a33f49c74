//! Cache configuration module

use serde::{Deserialize, Serialize};

/// Backend holding verification records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Shared Redis server (production)
    Redis,
    /// Process-local map (development and tests)
    Memory,
}

/// Code store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Which backend to use
    pub backend: CacheBackend,

    /// Redis connection URL
    pub url: String,

    /// Optional prefix prepended to every key as `prefix:key`
    pub key_prefix: Option<String>,

    /// Maximum attempts for retriable Redis operations
    pub max_retries: u32,

    /// Base delay between retries in milliseconds (doubles per attempt)
    pub retry_delay_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Redis,
            url: String::from("redis://127.0.0.1:6379"),
            key_prefix: None,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the key prefix for all cache keys
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Generate a cache key with prefix
    pub fn make_key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.backend, CacheBackend::Redis);
        assert_eq!(config.url, "redis://127.0.0.1:6379");
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_make_key() {
        let config = CacheConfig::new("redis://cache:6379").with_prefix("sms");
        assert_eq!(config.make_key("555-0100"), "sms:555-0100");
        assert_eq!(CacheConfig::default().make_key("555-0100"), "555-0100");
    }
}
