//! Shared configuration and common types for the SMS token service
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and loading
//! - Error response structures
//! - Utility functions (phone masking)

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheBackend, CacheConfig, ConfigError, DigestAlgorithm, Environment,
    LogFormat, LoggingConfig, ResendExpiryPolicy, ServerConfig, SignatureConfig, SmsConfig,
    SmsProvider, TokenConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use utils::phone;
