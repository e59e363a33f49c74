//! Cache module for verification record storage
//!
//! Provides the Redis client with retry logic, the Redis-backed code store
//! and an in-memory code store with the same atomic semantics.

pub mod code_store;
pub mod memory_store;
pub mod redis_client;

#[cfg(test)]
mod tests;

pub use code_store::RedisCodeStore;
pub use memory_store::InMemoryCodeStore;
pub use redis_client::RedisClient;

// Re-export commonly used types
pub use st_shared::CacheConfig;
