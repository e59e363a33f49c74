//! Adapter exposing an SMS service as the core notifier
//!
//! Bridges the infrastructure `SmsService` trait and its
//! `InfrastructureError` to `st_core`'s `NotifierTrait`.

use async_trait::async_trait;
use std::sync::Arc;

use st_core::services::NotifierTrait;

use super::sms_service::SmsService;

/// Notifier delivering codes through an [`SmsService`]
#[derive(Clone)]
pub struct SmsNotifier {
    inner: Arc<dyn SmsService>,
}

impl SmsNotifier {
    pub fn new(inner: Arc<dyn SmsService>) -> Self {
        Self { inner }
    }

    pub fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }
}

#[async_trait]
impl NotifierTrait for SmsNotifier {
    async fn send(&self, originator: &str, recipient: &str, text: &str) -> Result<String, String> {
        self.inner
            .send_sms(originator, recipient, text)
            .await
            .map_err(|e| e.to_string())
    }
}
