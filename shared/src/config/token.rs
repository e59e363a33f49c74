//! Verification code issuance configuration

use serde::{Deserialize, Serialize};

/// Upper bound on generated code length
pub const MAX_TOKEN_LENGTH: usize = 32;

/// What happens to a record's remaining lifetime when its code is re-sent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResendExpiryPolicy {
    /// Keep the expiry set when the code was first issued
    #[default]
    KeepRemaining,
    /// Drop the expiry so the record never lapses on its own
    Persist,
    /// Start a fresh keep-alive window from the resend
    Refresh,
}

/// Issuance rules shared by every recipient
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Number of decimal digits in a generated code
    pub token_length: usize,

    /// Seconds after a dispatch during which repeat requests are suppressed
    pub prevent_send_in_seconds: i64,

    /// Seconds a newly issued record stays in the store
    pub token_keep_alive_in_seconds: u64,

    /// Expiry handling on resend
    pub resend_expiry: ResendExpiryPolicy,

    /// Upper bound on a single SMS dispatch in milliseconds
    pub dispatch_timeout_ms: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            token_length: 6,
            prevent_send_in_seconds: 60,
            token_keep_alive_in_seconds: 3600,
            resend_expiry: ResendExpiryPolicy::KeepRemaining,
            dispatch_timeout_ms: 10_000,
        }
    }
}

impl TokenConfig {
    /// Validate issuance rules
    pub fn validate(&self) -> Result<(), String> {
        if self.token_length == 0 || self.token_length > MAX_TOKEN_LENGTH {
            return Err(format!(
                "token_length must be between 1 and {}, got {}",
                MAX_TOKEN_LENGTH, self.token_length
            ));
        }
        if self.prevent_send_in_seconds < 0 {
            return Err("prevent_send_in_seconds must not be negative".to_string());
        }
        if self.token_keep_alive_in_seconds as i128 <= self.prevent_send_in_seconds as i128 {
            return Err(format!(
                "token_keep_alive_in_seconds ({}) must exceed prevent_send_in_seconds ({})",
                self.token_keep_alive_in_seconds, self.prevent_send_in_seconds
            ));
        }
        if self.dispatch_timeout_ms == 0 {
            return Err("dispatch_timeout_ms must be greater than zero".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(TokenConfig::default().validate().is_ok());
    }

    #[test]
    fn test_length_bounds() {
        let mut config = TokenConfig {
            token_length: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.token_length = MAX_TOKEN_LENGTH + 1;
        assert!(config.validate().is_err());

        config.token_length = MAX_TOKEN_LENGTH;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_keep_alive_must_exceed_window() {
        let config = TokenConfig {
            prevent_send_in_seconds: 60,
            token_keep_alive_in_seconds: 60,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
