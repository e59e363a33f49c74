//! In-memory verification record store
//!
//! Single-process stand-in for Redis used in development and tests. Every
//! operation runs under one mutex, which makes the conditional writes
//! atomic. Expired entries are treated as absent and dropped lazily; writes
//! also sweep the whole map at most once per sweep interval.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use st_core::services::{CodeStoreTrait, Expiry, SystemTimeSource, TimeSource};

/// Longer TTLs are clamped to about a century
const MAX_TTL_SECONDS: i64 = 100 * 365 * 24 * 3600;

/// Minimum spacing between full sweeps of expired entries
const SWEEP_INTERVAL_SECONDS: i64 = 60;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

/// Code store backed by a process-local map
pub struct InMemoryCodeStore {
    entries: Mutex<HashMap<String, Entry>>,
    key_prefix: Option<String>,
    time_source: Arc<dyn TimeSource>,
    /// Unix seconds of the last sweep
    last_sweep: AtomicI64,
}

impl Default for InMemoryCodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCodeStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            key_prefix: None,
            time_source: Arc::new(SystemTimeSource),
            last_sweep: AtomicI64::new(i64::MIN),
        }
    }

    /// Namespace keys as `prefix:key`
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Use `time_source` to decide when entries expire
    pub fn with_time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    /// Remaining lifetime in whole seconds; `None` if absent or without expiry
    pub fn ttl(&self, key: &str) -> Option<i64> {
        let now = self.time_source.now();
        let mut entries = self.lock().ok()?;
        let entry = Self::live_entry(&mut entries, &self.key(key), now)?;
        entry.expires_at.map(|at| (at - now).num_seconds())
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        let now = self.time_source.now();
        match self.lock() {
            Ok(entries) => entries
                .values()
                .filter(|e| e.expires_at.map_or(true, |at| at > now))
                .count(),
            Err(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Entry>>, String> {
        self.entries
            .lock()
            .map_err(|_| "In-memory store lock poisoned".to_string())
    }

    /// Lock for a write, dropping every expired entry if a sweep is due
    fn lock_for_write(&self, now: DateTime<Utc>) -> Result<MutexGuard<'_, HashMap<String, Entry>>, String> {
        let mut entries = self.lock()?;
        let last = self.last_sweep.load(Ordering::Relaxed);
        if now.timestamp().saturating_sub(last) >= SWEEP_INTERVAL_SECONDS {
            let before = entries.len();
            entries.retain(|_, e| e.expires_at.map_or(true, |at| at > now));
            self.last_sweep.store(now.timestamp(), Ordering::Relaxed);
            let removed = before - entries.len();
            if removed > 0 {
                tracing::debug!(removed = removed, "Swept expired verification records");
            }
        }
        Ok(entries)
    }

    /// Entries held in the map, expired or not
    #[cfg(test)]
    pub(crate) fn raw_len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    fn expires_at(&self, ttl_seconds: u64) -> DateTime<Utc> {
        let ttl = i64::try_from(ttl_seconds).unwrap_or(MAX_TTL_SECONDS);
        self.time_source.now() + Duration::seconds(ttl.min(MAX_TTL_SECONDS))
    }

    /// Entry for `key` if it exists and has not expired
    fn live_entry<'a>(
        entries: &'a mut HashMap<String, Entry>,
        key: &str,
        now: DateTime<Utc>,
    ) -> Option<&'a mut Entry> {
        let expired = entries
            .get(key)
            .and_then(|e| e.expires_at)
            .map_or(false, |at| at <= now);
        if expired {
            entries.remove(key);
            return None;
        }
        entries.get_mut(key)
    }
}

#[async_trait]
impl CodeStoreTrait for InMemoryCodeStore {
    async fn get(&self, key: &str) -> Result<Option<String>, String> {
        let now = self.time_source.now();
        let mut entries = self.lock()?;
        Ok(Self::live_entry(&mut entries, &self.key(key), now).map(|e| e.value.clone()))
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), String> {
        let expires_at = self.expires_at(ttl_seconds);
        self.lock_for_write(self.time_source.now())?.insert(
            self.key(key),
            Entry {
                value: value.to_string(),
                expires_at: Some(expires_at),
            },
        );
        Ok(())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.lock_for_write(self.time_source.now())?.insert(
            self.key(key),
            Entry {
                value: value.to_string(),
                expires_at: None,
            },
        );
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<bool, String> {
        let now = self.time_source.now();
        let expires_at = self.expires_at(ttl_seconds);
        let key = self.key(key);
        let mut entries = self.lock_for_write(now)?;

        if Self::live_entry(&mut entries, &key, now).is_some() {
            return Ok(false);
        }
        entries.insert(
            key,
            Entry {
                value: value.to_string(),
                expires_at: Some(expires_at),
            },
        );
        Ok(true)
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: &str,
        value: &str,
        expiry: Expiry,
    ) -> Result<bool, String> {
        let now = self.time_source.now();
        let new_expiry = match expiry {
            Expiry::After(seconds) => Some(self.expires_at(seconds)),
            _ => None,
        };
        let mut entries = self.lock_for_write(now)?;

        match Self::live_entry(&mut entries, &self.key(key), now) {
            Some(entry) if entry.value == expected => {
                entry.value = value.to_string();
                entry.expires_at = match expiry {
                    Expiry::Keep => entry.expires_at,
                    Expiry::Persist => None,
                    Expiry::After(_) => new_expiry,
                };
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, String> {
        let now = self.time_source.now();
        let key = self.key(key);
        let mut entries = self.lock_for_write(now)?;

        let matches = Self::live_entry(&mut entries, &key, now).map_or(false, |e| e.value == expected);
        if matches {
            entries.remove(&key);
        }
        Ok(matches)
    }
}
