//! Redis-backed verification record store

use async_trait::async_trait;

use st_core::services::{CodeStoreTrait, Expiry};

use super::redis_client::RedisClient;

/// Code store keeping one record per recipient in Redis
///
/// Keys are namespaced with the configured `cache.key_prefix`.
#[derive(Clone)]
pub struct RedisCodeStore {
    client: RedisClient,
}

impl RedisCodeStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn key(&self, recipient: &str) -> String {
        self.client.config().make_key(recipient)
    }
}

#[async_trait]
impl CodeStoreTrait for RedisCodeStore {
    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        self.client.get(&self.key(key)).await.map_err(|e| e.to_string())
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), String> {
        self.client
            .set_with_expiry(&self.key(key), value, ttl_seconds)
            .await
            .map_err(|e| e.to_string())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.client
            .set(&self.key(key), value)
            .await
            .map_err(|e| e.to_string())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<bool, String> {
        self.client
            .set_if_absent(&self.key(key), value, ttl_seconds)
            .await
            .map_err(|e| e.to_string())
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: &str,
        value: &str,
        expiry: Expiry,
    ) -> Result<bool, String> {
        self.client
            .compare_and_swap(&self.key(key), expected, value, expiry)
            .await
            .map_err(|e| e.to_string())
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, String> {
        self.client
            .delete_if_equals(&self.key(key), expected)
            .await
            .map_err(|e| e.to_string())
    }
}
