//! Twilio SMS Service Implementation
//!
//! Sends messages through Twilio's REST API
//! (`POST /2010-04-01/Accounts/{sid}/Messages.json`) with basic auth.
//! Rate limiting (429) and server errors are retried with exponential
//! backoff; other client errors fail immediately.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use st_shared::utils::mask_phone;
use st_shared::SmsConfig;

use crate::{sms::sms_service::SmsService, InfrastructureError};

/// Twilio rejects bodies longer than this
pub const MAX_BODY_LENGTH: usize = 1600;

/// Twilio SMS service configuration
#[derive(Clone)]
pub struct TwilioConfig {
    /// Twilio Account SID
    pub account_sid: String,
    /// Twilio Auth Token
    pub auth_token: String,
    /// API base URL, e.g. `https://api.twilio.com`
    pub api_base_url: String,
    /// Maximum attempts per message
    pub max_retries: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl TryFrom<&SmsConfig> for TwilioConfig {
    type Error = InfrastructureError;

    fn try_from(config: &SmsConfig) -> Result<Self, Self::Error> {
        let account_sid = config
            .account_sid
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| InfrastructureError::Config("sms.account_sid not set".to_string()))?;
        let auth_token = config
            .auth_token
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| InfrastructureError::Config("sms.auth_token not set".to_string()))?;

        Ok(Self {
            account_sid,
            auth_token,
            api_base_url: config.api_base_url.clone(),
            max_retries: config.max_retries.max(1),
            retry_delay_ms: config.retry_delay_ms,
            request_timeout_secs: config.request_timeout_secs,
        })
    }
}

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<i64>,
    message: Option<String>,
}

/// Twilio SMS service implementation
pub struct TwilioSmsService {
    client: reqwest::Client,
    config: TwilioConfig,
}

impl TwilioSmsService {
    /// Create a new Twilio SMS service
    pub fn new(config: TwilioConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            "Twilio SMS service initialized for account {}",
            config.account_sid
        );

        Ok(Self { client, config })
    }

    /// Messages endpoint for the configured account
    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.account_sid
        )
    }

    /// Send SMS with retry logic
    async fn send_with_retry(&self, from: &str, to: &str, body: &str) -> Result<String, InfrastructureError> {
        let url = self.messages_url();
        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);

        loop {
            attempts += 1;

            debug!(
                "Sending SMS attempt {}/{} to {}",
                attempts,
                self.config.max_retries,
                mask_phone(to)
            );

            let result = self
                .client
                .post(&url)
                .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
                .form(&[("From", from), ("To", to), ("Body", body)])
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => {
                    let message: MessageResource = response.json().await?;
                    info!(
                        "SMS sent successfully to {} with SID: {}",
                        mask_phone(to),
                        message.sid
                    );
                    return Ok(message.sid);
                }
                Ok(response) => {
                    let status = response.status();
                    let detail = describe_error(&response.text().await.unwrap_or_default());

                    if !is_retriable_status(status) {
                        error!("Twilio rejected SMS ({}): {}", status, detail);
                        return Err(InfrastructureError::Sms(format!(
                            "Twilio rejected message ({}): {}",
                            status, detail
                        )));
                    }
                    if attempts >= self.config.max_retries {
                        error!(
                            "Failed to send SMS after {} attempts ({}): {}",
                            attempts, status, detail
                        );
                        return Err(InfrastructureError::Sms(format!(
                            "Failed to send SMS after {} attempts: {} {}",
                            attempts, status, detail
                        )));
                    }
                    warn!(
                        "Twilio returned {} (attempt {}/{}), retrying after {:?}",
                        status, attempts, self.config.max_retries, delay
                    );
                }
                Err(e) => {
                    // Only a failed connect proves the request never reached Twilio
                    if !e.is_connect() {
                        error!("Twilio request failed, not retrying: {}", e);
                        return Err(InfrastructureError::Http(e));
                    }
                    if attempts >= self.config.max_retries {
                        error!("Failed to send SMS after {} attempts: {}", attempts, e);
                        return Err(InfrastructureError::Http(e));
                    }
                    warn!(
                        "Twilio connection failed (attempt {}/{}): {}, retrying after {:?}",
                        attempts, self.config.max_retries, e, delay
                    );
                }
            }

            tokio::time::sleep(delay).await;
            delay *= 2;
        }
    }
}

#[async_trait]
impl SmsService for TwilioSmsService {
    async fn send_sms(&self, from: &str, to: &str, body: &str) -> Result<String, InfrastructureError> {
        if body.chars().count() > MAX_BODY_LENGTH {
            return Err(InfrastructureError::Sms(format!(
                "Message exceeds maximum length of {} characters",
                MAX_BODY_LENGTH
            )));
        }

        info!(
            "Sending SMS to {} via Twilio (message length: {} chars)",
            mask_phone(to),
            body.len()
        );

        self.send_with_retry(from, to, body).await
    }

    fn provider_name(&self) -> &str {
        "Twilio"
    }
}

/// Whether a response status is worth retrying
pub(crate) fn is_retriable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Human-readable summary of a Twilio error body
fn describe_error(body: &str) -> String {
    match serde_json::from_str::<ApiError>(body) {
        Ok(ApiError {
            code: Some(code),
            message: Some(message),
        }) => format!("{} (code {})", message, code),
        Ok(ApiError {
            message: Some(message),
            ..
        }) => message,
        _ => body.chars().take(200).collect(),
    }
}
