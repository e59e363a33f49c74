//! SMS transport configuration

use serde::{Deserialize, Serialize};

/// Outbound SMS provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    /// Records messages in memory and logs them
    #[default]
    Mock,
    /// Twilio REST API
    Twilio,
}

/// SMS transport settings
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SmsConfig {
    pub provider: SmsProvider,

    /// Twilio account SID
    pub account_sid: Option<String>,

    /// Twilio auth token
    pub auth_token: Option<String>,

    /// Base URL of the Twilio API
    pub api_base_url: String,

    /// Maximum attempts per message
    pub max_retries: u32,

    /// Base delay between attempts in milliseconds
    pub retry_delay_ms: u64,

    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: SmsProvider::Mock,
            account_sid: None,
            auth_token: None,
            api_base_url: String::from("https://api.twilio.com"),
            max_retries: 3,
            retry_delay_ms: 1000,
            request_timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for SmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsConfig")
            .field("provider", &self.provider)
            .field("account_sid", &self.account_sid)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl SmsConfig {
    /// Validate provider settings
    pub fn validate(&self) -> Result<(), String> {
        if self.provider == SmsProvider::Twilio {
            let missing = |value: &Option<String>| value.as_deref().map_or(true, str::is_empty);
            if missing(&self.account_sid) || missing(&self.auth_token) {
                return Err("sms.account_sid and sms.auth_token are required for twilio".to_string());
            }
        }
        if self.max_retries == 0 {
            return Err("sms.max_retries must be at least 1".to_string());
        }
        Ok(())
    }
}
