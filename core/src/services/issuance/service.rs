//! Main issuance service implementation

use std::sync::Arc;

use st_shared::utils::mask_phone;
use st_shared::ResendExpiryPolicy;

use crate::domain::entities::VerificationRecord;
use crate::errors::{DomainError, DomainResult};
use crate::services::clock::{SystemTimeSource, TimeSource};
use crate::services::traits::{CodeStoreTrait, Expiry, NotifierTrait};

use super::config::IssuanceConfig;

/// Result of a send request
///
/// All three outcomes are successes; callers outside the service should not
/// be able to tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A new code was generated and dispatched
    Issued,
    /// The stored code was dispatched again
    Resent,
    /// Nothing was dispatched
    Suppressed,
}

/// Issuance service for SMS verification codes
pub struct IssuanceService<N: NotifierTrait, S: CodeStoreTrait> {
    /// Outbound SMS channel
    notifier: Arc<N>,
    /// Store holding one record per recipient
    store: Arc<S>,
    /// Service configuration
    config: IssuanceConfig,
    /// Clock used for `issued_at` and the resend window
    time_source: Arc<dyn TimeSource>,
}

impl<N: NotifierTrait, S: CodeStoreTrait> IssuanceService<N, S> {
    /// Create a new issuance service
    ///
    /// # Arguments
    ///
    /// * `notifier` - SMS channel implementation
    /// * `store` - Code store implementation
    /// * `config` - Issuance rules
    pub fn new(notifier: Arc<N>, store: Arc<S>, config: IssuanceConfig) -> Self {
        Self {
            notifier,
            store,
            config,
            time_source: Arc::new(SystemTimeSource),
        }
    }

    /// Replace the wall clock
    pub fn with_time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    pub fn config(&self) -> &IssuanceConfig {
        &self.config
    }

    /// Handle a send request for `recipient`
    ///
    /// This method:
    /// 1. Reads the recipient's record from the store
    /// 2. On a miss, generates a code, claims the slot and dispatches
    /// 3. On a hit inside the resend window, does nothing
    /// 4. On a hit past the window, swaps in a record with a new
    ///    `issued_at` and dispatches the stored code again
    ///
    /// A claim whose dispatch fails is rolled back so the next request can
    /// try again. The resend expiry policy is applied only after a resend was
    /// dispatched, and a resend that finds its record gone issues a new code.
    ///
    /// # Returns
    ///
    /// * `Ok(DispatchOutcome)` - What was done
    /// * `Err(DomainError)` - Store, decode, generation or notifier failure
    pub async fn request_send(
        &self,
        recipient: &str,
        originator: &str,
        message_template: &str,
    ) -> DomainResult<DispatchOutcome> {
        if recipient.is_empty() {
            return Err(DomainError::Validation {
                message: "Recipient must not be empty".to_string(),
            });
        }

        let existing = self
            .store
            .get(recipient)
            .await
            .map_err(|e| store_error(recipient, "read", e))?;

        match existing {
            None => self.issue_fresh(recipient, originator, message_template).await,
            Some(raw) => {
                self.resend_existing(recipient, raw, originator, message_template)
                    .await
            }
        }
    }

    async fn issue_fresh(
        &self,
        recipient: &str,
        originator: &str,
        message_template: &str,
    ) -> DomainResult<DispatchOutcome> {
        let code = VerificationRecord::generate_code(self.config.token_length).map_err(|e| {
            tracing::error!(
                error = %e,
                event = "otp_generation_failed",
                "Failed to generate verification code"
            );
            DomainError::CodeGeneration {
                message: e.to_string(),
            }
        })?;

        let record = VerificationRecord::new(
            recipient,
            originator,
            message_template,
            code,
            self.time_source.now(),
        );
        let encoded = record.encode()?;

        let claimed = self
            .store
            .set_if_absent(recipient, &encoded, self.config.token_keep_alive_in_seconds)
            .await
            .map_err(|e| store_error(recipient, "claim", e))?;

        if !claimed {
            tracing::info!(
                recipient = %mask_phone(recipient),
                event = "otp_suppressed",
                reason = "concurrent_issue",
                "Another request issued a code first"
            );
            return Ok(DispatchOutcome::Suppressed);
        }

        if let Err(err) = self.dispatch(recipient, &record).await {
            if let Err(e) = self.store.delete_if_equals(recipient, &encoded).await {
                tracing::warn!(
                    recipient = %mask_phone(recipient),
                    error = %e,
                    event = "otp_rollback_failed",
                    "Failed to release claim after dispatch failure"
                );
            }
            return Err(err);
        }

        tracing::info!(
            recipient = %mask_phone(recipient),
            event = "otp_issued",
            ttl_seconds = self.config.token_keep_alive_in_seconds,
            "Issued new verification code"
        );

        Ok(DispatchOutcome::Issued)
    }

    async fn resend_existing(
        &self,
        recipient: &str,
        raw: String,
        originator: &str,
        message_template: &str,
    ) -> DomainResult<DispatchOutcome> {
        let record = VerificationRecord::decode(&raw).map_err(|e| {
            tracing::error!(
                recipient = %mask_phone(recipient),
                error = %e,
                event = "otp_record_corrupt",
                "Stored verification record could not be decoded"
            );
            e
        })?;

        let now = self.time_source.now();
        let elapsed = record.elapsed_seconds(now);
        if elapsed <= self.config.prevent_send_in_seconds {
            tracing::info!(
                recipient = %mask_phone(recipient),
                event = "otp_suppressed",
                elapsed_seconds = elapsed,
                window_seconds = self.config.prevent_send_in_seconds,
                "Send request inside resend window"
            );
            return Ok(DispatchOutcome::Suppressed);
        }

        let resent = record.resent_at(now);
        let encoded = resent.encode()?;

        // The TTL is left alone until the dispatch is known to have succeeded
        let swapped = self
            .store
            .compare_and_swap(recipient, &raw, &encoded, Expiry::Keep)
            .await
            .map_err(|e| store_error(recipient, "swap", e))?;

        if !swapped {
            let current = self
                .store
                .get(recipient)
                .await
                .map_err(|e| store_error(recipient, "read", e))?;

            if current.is_none() {
                tracing::info!(
                    recipient = %mask_phone(recipient),
                    event = "otp_record_lapsed",
                    "Record expired before resend, issuing a new code"
                );
                return self.issue_fresh(recipient, originator, message_template).await;
            }

            tracing::info!(
                recipient = %mask_phone(recipient),
                event = "otp_suppressed",
                reason = "concurrent_resend",
                "Record changed since it was read"
            );
            return Ok(DispatchOutcome::Suppressed);
        }

        if let Err(err) = self.dispatch(recipient, &resent).await {
            if let Err(e) = self
                .store
                .compare_and_swap(recipient, &encoded, &raw, Expiry::Keep)
                .await
            {
                tracing::warn!(
                    recipient = %mask_phone(recipient),
                    error = %e,
                    event = "otp_rollback_failed",
                    "Failed to restore record after dispatch failure"
                );
            }
            return Err(err);
        }

        self.apply_resend_expiry(recipient, &encoded).await;

        tracing::info!(
            recipient = %mask_phone(recipient),
            event = "otp_resent",
            elapsed_seconds = elapsed,
            "Resent existing verification code"
        );

        Ok(DispatchOutcome::Resent)
    }

    /// Apply the configured resend expiry to a record that was just resent
    async fn apply_resend_expiry(&self, recipient: &str, encoded: &str) {
        let expiry = match self.config.resend_expiry {
            ResendExpiryPolicy::KeepRemaining => return,
            ResendExpiryPolicy::Persist => Expiry::Persist,
            ResendExpiryPolicy::Refresh => Expiry::After(self.config.token_keep_alive_in_seconds),
        };

        match self
            .store
            .compare_and_swap(recipient, encoded, encoded, expiry)
            .await
        {
            Ok(true) => {}
            Ok(false) => tracing::debug!(
                recipient = %mask_phone(recipient),
                "Record changed before resend expiry was applied"
            ),
            Err(e) => tracing::warn!(
                recipient = %mask_phone(recipient),
                error = %e,
                event = "otp_expiry_update_failed",
                "Failed to apply resend expiry"
            ),
        }
    }

    /// Send the record's message to `recipient`, bounded by the dispatch timeout
    async fn dispatch(&self, recipient: &str, record: &VerificationRecord) -> DomainResult<String> {
        let text = record.message();
        let send = self.notifier.send(&record.originator, recipient, &text);

        match tokio::time::timeout(self.config.dispatch_timeout, send).await {
            Ok(Ok(message_id)) => {
                tracing::debug!(
                    recipient = %mask_phone(recipient),
                    message_id = %message_id,
                    "Notifier accepted message"
                );
                Ok(message_id)
            }
            Ok(Err(e)) => {
                tracing::error!(
                    recipient = %mask_phone(recipient),
                    error = %e,
                    event = "otp_dispatch_failed",
                    "Failed to send verification code"
                );
                Err(DomainError::Notifier { message: e })
            }
            Err(_) => {
                let timeout_ms = self.config.dispatch_timeout.as_millis() as u64;
                tracing::error!(
                    recipient = %mask_phone(recipient),
                    timeout_ms = timeout_ms,
                    event = "otp_dispatch_timeout",
                    "Notifier did not answer in time"
                );
                Err(DomainError::NotifierTimeout { timeout_ms })
            }
        }
    }
}

fn store_error(recipient: &str, operation: &str, message: String) -> DomainError {
    tracing::error!(
        recipient = %mask_phone(recipient),
        operation = operation,
        error = %message,
        event = "code_store_failed",
        "Code store operation failed"
    );
    DomainError::Store { message }
}
