//! Mock SMS Service Implementation
//!
//! Logs messages instead of sending them and keeps a copy of each one so
//! tests can read back the delivered code.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use st_shared::utils::mask_phone;

use super::sms_service::SmsService;
use crate::InfrastructureError;

/// A message accepted by the mock service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentSms {
    pub message_id: String,
    pub from: String,
    pub to: String,
    pub body: String,
}

/// Mock SMS service for development and testing
///
/// Clones share their counter, outbox and failure switch.
#[derive(Clone, Default)]
pub struct MockSmsService {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Every accepted message, oldest first
    outbox: Arc<Mutex<Vec<SentSms>>>,
    /// Whether to simulate failures (for testing)
    simulate_failure: Arc<AtomicBool>,
    /// Artificial delay before each send
    latency: Option<Duration>,
}

impl MockSmsService {
    /// Create a new mock SMS service
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every send by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// Copy of every message sent so far
    pub fn sent_messages(&self) -> Vec<SentSms> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }

    /// Most recent message sent to `to`
    pub fn last_message_to(&self, to: &str) -> Option<SentSms> {
        self.sent_messages().into_iter().rev().find(|m| m.to == to)
    }
}

#[async_trait]
impl SmsService for MockSmsService {
    async fn send_sms(&self, from: &str, to: &str, body: &str) -> Result<String, InfrastructureError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(
                "Mock SMS service simulating failure for phone: {}",
                mask_phone(to)
            );
            return Err(InfrastructureError::Sms(
                "Simulated SMS sending failure".to_string(),
            ));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        self.message_count.fetch_add(1, Ordering::SeqCst);

        self.outbox
            .lock()
            .map_err(|_| InfrastructureError::Sms("Mock outbox lock poisoned".to_string()))?
            .push(SentSms {
                message_id: message_id.clone(),
                from: from.to_string(),
                to: to.to_string(),
                body: body.to_string(),
            });

        info!(
            target: "sms_service",
            provider = "mock",
            phone = %mask_phone(to),
            message_id = %message_id,
            message_length = body.len(),
            "SMS sent successfully (mock)"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}
