//! # Infrastructure Layer
//!
//! Concrete implementations of the ports defined in `st_core`:
//!
//! - **Cache**: Redis client with retry logic, the Redis-backed code store
//!   and an in-memory code store for development and tests
//! - **SMS**: the SMS service trait, Twilio REST and mock transports, and
//!   the adapter exposing them as the core notifier

/// Cache module - Redis client and code stores
pub mod cache;

/// SMS service module - External SMS providers
pub mod sms;

pub use cache::{InMemoryCodeStore, RedisClient, RedisCodeStore};
pub use sms::{create_sms_service, MockSmsService, SmsNotifier, SmsService, TwilioSmsService};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),
}
