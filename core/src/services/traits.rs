//! Traits for SMS and code store integration

use async_trait::async_trait;

/// Outbound notification channel
#[async_trait]
pub trait NotifierTrait: Send + Sync {
    /// Deliver `text` to `recipient`, returning the provider's message id
    async fn send(&self, originator: &str, recipient: &str, text: &str) -> Result<String, String>;
}

/// Expiry applied by a conditional overwrite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Keep whatever expiry the key already has
    Keep,
    /// Remove the expiry
    Persist,
    /// Expire after the given number of seconds
    After(u64),
}

/// TTL-capable key-value store holding serialized verification records
///
/// Keys are recipients; implementations may add a namespace prefix.
/// The conditional operations are atomic per key.
#[async_trait]
pub trait CodeStoreTrait: Send + Sync {
    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>, String>;

    /// Write `value` with an expiry in seconds
    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), String>;

    /// Write `value` with no expiry
    async fn set(&self, key: &str, value: &str) -> Result<(), String>;

    /// Write `value` with an expiry only if `key` is absent; `true` if written
    async fn set_if_absent(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<bool, String>;

    /// Replace the value only if it still equals `expected`; `true` if replaced
    async fn compare_and_swap(
        &self,
        key: &str,
        expected: &str,
        value: &str,
        expiry: Expiry,
    ) -> Result<bool, String>;

    /// Delete `key` only if its value equals `expected`; `true` if deleted
    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, String>;
}
