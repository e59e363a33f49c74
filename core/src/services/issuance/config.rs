//! Configuration for the issuance engine

use std::time::Duration;

use st_shared::{ResendExpiryPolicy, TokenConfig};

/// Issuance rules consumed by [`IssuanceService`](super::IssuanceService)
#[derive(Debug, Clone)]
pub struct IssuanceConfig {
    /// Number of digits in a generated code
    pub token_length: usize,
    /// Window after a dispatch in which repeat sends are suppressed (seconds)
    pub prevent_send_in_seconds: i64,
    /// Lifetime of a freshly issued record (seconds)
    pub token_keep_alive_in_seconds: u64,
    /// Expiry handling when a code is resent
    pub resend_expiry: ResendExpiryPolicy,
    /// Upper bound on a single notifier call
    pub dispatch_timeout: Duration,
}

impl Default for IssuanceConfig {
    fn default() -> Self {
        Self::from(&TokenConfig::default())
    }
}

impl From<&TokenConfig> for IssuanceConfig {
    fn from(config: &TokenConfig) -> Self {
        Self {
            token_length: config.token_length,
            prevent_send_in_seconds: config.prevent_send_in_seconds,
            token_keep_alive_in_seconds: config.token_keep_alive_in_seconds,
            resend_expiry: config.resend_expiry,
            dispatch_timeout: Duration::from_millis(config.dispatch_timeout_ms),
        }
    }
}
