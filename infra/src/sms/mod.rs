//! SMS Service Module
//!
//! SMS transports for delivering verification codes:
//!
//! - **SMS Service Trait**: Common interface for all SMS providers
//! - **Mock Implementation**: Logs and records messages for development
//! - **Twilio Support**: Production SMS via the Twilio REST API
//! - **Notifier Adapter**: Exposes any transport as the core notifier

use std::sync::Arc;

use st_shared::{SmsConfig, SmsProvider};

pub mod mock_sms;
pub mod notifier;
pub mod sms_service;
pub mod twilio;

// Re-export commonly used types
pub use mock_sms::{MockSmsService, SentSms};
pub use notifier::SmsNotifier;
pub use sms_service::SmsService;
pub use twilio::{TwilioConfig, TwilioSmsService};

use crate::InfrastructureError;

#[cfg(test)]
mod tests;

/// Create an SMS service based on configuration
///
/// # Arguments
///
/// * `config` - SMS configuration containing provider settings
///
/// # Returns
///
/// The configured transport, or a configuration error when the provider
/// cannot be initialized
pub fn create_sms_service(config: &SmsConfig) -> Result<Arc<dyn SmsService>, InfrastructureError> {
    match config.provider {
        SmsProvider::Mock => {
            tracing::warn!("Using mock SMS service; messages are logged, not delivered");
            Ok(Arc::new(MockSmsService::new()))
        }
        SmsProvider::Twilio => {
            let twilio_config = TwilioConfig::try_from(config)?;
            Ok(Arc::new(TwilioSmsService::new(twilio_config)?))
        }
    }
}
