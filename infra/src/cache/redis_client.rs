//! Redis cache client implementation
//!
//! Redis client with connection retry, bounded exponential backoff for
//! plain reads and writes, and atomic conditional writes used to claim and
//! update verification records. Conditional writes run exactly once: a
//! retried `SET NX` whose first attempt succeeded would report a loss.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult, Script};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use st_core::services::Expiry;
use st_shared::CacheConfig;

use crate::InfrastructureError;

/// Backoff cap between retries
const MAX_RETRY_DELAY_MS: u64 = 5000;

/// Replace the value if it equals ARGV[1]; ARGV[3] selects the expiry mode
const COMPARE_AND_SWAP_SCRIPT: &str = r#"
if redis.call('GET', KEYS[1]) ~= ARGV[1] then
  return 0
end
if ARGV[3] == 'keep' then
  redis.call('SET', KEYS[1], ARGV[2], 'KEEPTTL')
elseif ARGV[3] == 'persist' then
  redis.call('SET', KEYS[1], ARGV[2])
else
  redis.call('SET', KEYS[1], ARGV[2], 'EX', ARGV[4])
end
return 1
"#;

/// Delete the key if its value equals ARGV[1]
const DELETE_IF_EQUALS_SCRIPT: &str = r#"
if redis.call('GET', KEYS[1]) == ARGV[1] then
  return redis.call('DEL', KEYS[1])
end
return 0
"#;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis cache client with retry logic
///
/// Cloning is cheap; clones share the multiplexed connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Configuration used to create this client
    config: CacheConfig,
    compare_and_swap_script: Script,
    delete_if_equals_script: Script,
}

impl RedisClient {
    /// Create a new Redis client
    ///
    /// # Arguments
    /// * `config` - Cache configuration settings (URL and retry parameters)
    ///
    /// # Returns
    /// * `Result<Self, InfrastructureError>` - Redis client or error
    ///
    /// # Example
    /// ```no_run
    /// use st_infra::cache::RedisClient;
    /// use st_shared::CacheConfig;
    ///
    /// async fn create_client() -> Result<RedisClient, Box<dyn std::error::Error>> {
    ///     let config = CacheConfig::new("redis://localhost:6379").with_prefix("sms");
    ///     let client = RedisClient::new(config).await?;
    ///     Ok(client)
    /// }
    /// ```
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!("Creating Redis client with URL: {}", mask_url(&config.url));

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection =
            Self::create_connection_with_retry(client, config.max_retries, config.retry_delay_ms)
                .await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection,
            config,
            compare_and_swap_script: Script::new(COMPARE_AND_SWAP_SCRIPT),
            delete_if_equals_script: Script::new(DELETE_IF_EQUALS_SCRIPT),
        })
    }

    /// Configuration used to create this client
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Create multiplexed connection with retry logic
    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Get a value from cache
    ///
    /// # Returns
    /// * `Result<Option<String>, InfrastructureError>` - Cached value or None if not found
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        debug!("Getting key '{}'", key);

        let result = self
            .execute_with_retry(|mut conn| {
                let key = key.to_string();
                Box::pin(async move { conn.get::<_, Option<String>>(key).await })
            })
            .await;

        result.map_err(|e| {
            error!("Failed to get key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Set a value with expiration time in seconds
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        debug!("Setting key '{}' with expiry {}s", key, expiry_seconds);

        self.execute_with_retry(|mut conn| {
            let key = key.to_string();
            let value = value.to_string();
            Box::pin(async move { conn.set_ex::<_, _, ()>(key, value, expiry_seconds).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to set key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Set a value without expiry, clearing any existing TTL
    pub async fn set(&self, key: &str, value: &str) -> Result<(), InfrastructureError> {
        debug!("Setting key '{}' without expiry", key);

        self.execute_with_retry(|mut conn| {
            let key = key.to_string();
            let value = value.to_string();
            Box::pin(async move { conn.set::<_, _, ()>(key, value).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to set key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// `SET key value NX EX ttl`
    ///
    /// # Returns
    /// * `Ok(true)` - The key was absent and is now set
    /// * `Ok(false)` - The key already existed; nothing changed
    pub async fn set_if_absent(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<bool, InfrastructureError> {
        debug!("Setting key '{}' if absent with expiry {}s", key, expiry_seconds);

        let result = self
            .execute_once(|mut conn| {
                let key = key.to_string();
                let value = value.to_string();
                Box::pin(async move {
                    redis::cmd("SET")
                        .arg(key)
                        .arg(value)
                        .arg("NX")
                        .arg("EX")
                        .arg(expiry_seconds)
                        .query_async::<_, Option<String>>(&mut conn)
                        .await
                })
            })
            .await;

        match result {
            Ok(reply) => Ok(reply.is_some()),
            Err(e) => {
                error!("Failed to set key '{}' if absent: {}", key, e);
                Err(InfrastructureError::Cache(e))
            }
        }
    }

    /// Atomically replace the value of `key` if it still equals `expected`
    ///
    /// `Expiry::Keep` relies on `SET ... KEEPTTL` (Redis 6.0 or newer).
    pub async fn compare_and_swap(
        &self,
        key: &str,
        expected: &str,
        value: &str,
        expiry: Expiry,
    ) -> Result<bool, InfrastructureError> {
        debug!("Compare-and-swap on key '{}' ({:?})", key, expiry);

        let (mode, ttl) = match expiry {
            Expiry::Keep => ("keep", 0),
            Expiry::Persist => ("persist", 0),
            Expiry::After(seconds) => ("expire", seconds),
        };

        let result = self
            .execute_once(|mut conn| {
                let script = self.compare_and_swap_script.clone();
                let key = key.to_string();
                let expected = expected.to_string();
                let value = value.to_string();
                Box::pin(async move {
                    script
                        .key(key)
                        .arg(expected)
                        .arg(value)
                        .arg(mode)
                        .arg(ttl)
                        .invoke_async::<_, i64>(&mut conn)
                        .await
                })
            })
            .await;

        match result {
            Ok(swapped) => Ok(swapped == 1),
            Err(e) => {
                error!("Compare-and-swap on key '{}' failed: {}", key, e);
                Err(InfrastructureError::Cache(e))
            }
        }
    }

    /// Atomically delete `key` if its value equals `expected`
    pub async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool, InfrastructureError> {
        debug!("Compare-and-delete on key '{}'", key);

        let result = self
            .execute_once(|mut conn| {
                let script = self.delete_if_equals_script.clone();
                let key = key.to_string();
                let expected = expected.to_string();
                Box::pin(async move {
                    script
                        .key(key)
                        .arg(expected)
                        .invoke_async::<_, i64>(&mut conn)
                        .await
                })
            })
            .await;

        match result {
            Ok(deleted) => Ok(deleted > 0),
            Err(e) => {
                error!("Compare-and-delete on key '{}' failed: {}", key, e);
                Err(InfrastructureError::Cache(e))
            }
        }
    }

    /// Check if the Redis connection is healthy
    ///
    /// Performs a PING command to verify connectivity.
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        debug!("Performing Redis health check");

        let result = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await;

        match result {
            Ok(response) if response == "PONG" => Ok(true),
            Ok(response) => {
                warn!("Redis health check returned unexpected response: {}", response);
                Ok(false)
            }
            Err(e) => {
                error!("Redis health check failed: {}", e);
                Err(InfrastructureError::Cache(e))
            }
        }
    }

    /// Execute a Redis operation with automatic retry logic
    ///
    /// Only for idempotent operations; uses exponential backoff capped at
    /// five seconds.
    async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.config.retry_delay_ms;

        loop {
            attempts += 1;
            let conn = self.connection.clone();

            match operation(conn).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < self.config.max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, self.config.max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY_MS);
                }
                Err(e) => {
                    error!("Redis operation failed after {} attempts: {}", attempts, e);
                    return Err(e);
                }
            }
        }
    }

    /// Execute a conditional Redis operation exactly once
    async fn execute_once<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: FnOnce(MultiplexedConnection) -> RedisFuture<T>,
    {
        operation(self.connection.clone()).await
    }
}

/// Check if a Redis error is transient and the operation may be retried
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Mask credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let (Some(at_pos), Some(proto_end)) = (url.rfind('@'), url.find("://")) {
        if at_pos > proto_end {
            return format!("{}****{}", &url[..proto_end + 3], &url[at_pos..]);
        }
    }
    url.to_string()
}
