//! SMS Service Interface
//!
//! Defines the trait for SMS transports used to deliver verification codes.

use async_trait::async_trait;

use crate::InfrastructureError;

/// SMS service trait for sending text messages
///
/// Implementations include:
/// - Twilio REST API
/// - Mock implementation for development
#[async_trait]
pub trait SmsService: Send + Sync {
    /// Send an SMS message
    ///
    /// # Arguments
    ///
    /// * `from` - Sender identity shown to the recipient
    /// * `to` - The recipient's phone number
    /// * `body` - The message content to send
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Provider identifier for the sent message
    /// * `Err(InfrastructureError)` - If sending fails
    async fn send_sms(&self, from: &str, to: &str, body: &str) -> Result<String, InfrastructureError>;

    /// Get the service provider name
    fn provider_name(&self) -> &str;
}
