//! Main verification service implementation

use constant_time_eq::constant_time_eq;
use std::sync::Arc;

use st_shared::utils::mask_phone;

use crate::domain::entities::VerificationRecord;
use crate::errors::{DomainError, DomainResult};
use crate::services::traits::CodeStoreTrait;

/// Verification service for submitted SMS codes
pub struct VerificationService<S: CodeStoreTrait> {
    /// Store holding one record per recipient
    store: Arc<S>,
    /// Expected length of a submitted code
    token_length: usize,
}

impl<S: CodeStoreTrait> VerificationService<S> {
    pub fn new(store: Arc<S>, token_length: usize) -> Self {
        Self {
            store,
            token_length,
        }
    }

    /// Check `submitted` against the code last issued to `recipient`
    ///
    /// The length check runs before any store access. A matching code is
    /// not consumed; it stays valid until the record expires.
    ///
    /// # Returns
    ///
    /// * `Ok(bool)` - Whether the code matches
    /// * `Err(DomainError::InvalidCodeLength)` - Submitted code has the wrong length
    /// * `Err(DomainError::CodeNotFound)` - No record for the recipient
    /// * `Err(DomainError)` - Store or decode failure
    pub async fn verify(&self, recipient: &str, submitted: &str) -> DomainResult<bool> {
        if submitted.len() != self.token_length {
            tracing::warn!(
                recipient = %mask_phone(recipient),
                code_length = submitted.len(),
                event = "invalid_code_format",
                "Submitted code has the wrong length"
            );
            return Err(DomainError::InvalidCodeLength {
                expected: self.token_length,
                actual: submitted.len(),
            });
        }

        let raw = self
            .store
            .get(recipient)
            .await
            .map_err(|e| {
                tracing::error!(
                    recipient = %mask_phone(recipient),
                    error = %e,
                    event = "code_store_failed",
                    "Failed to read verification record"
                );
                DomainError::Store { message: e }
            })?
            .ok_or_else(|| {
                tracing::info!(
                    recipient = %mask_phone(recipient),
                    event = "verification_code_missing",
                    "No verification code on record"
                );
                DomainError::CodeNotFound
            })?;

        let record = VerificationRecord::decode(&raw)?;
        let matched = constant_time_eq(record.code.as_bytes(), submitted.as_bytes());

        if matched {
            tracing::info!(
                recipient = %mask_phone(recipient),
                event = "verification_success",
                "Verification code matched"
            );
        } else {
            tracing::warn!(
                recipient = %mask_phone(recipient),
                event = "verification_failed",
                "Verification code did not match"
            );
        }

        Ok(matched)
    }
}
