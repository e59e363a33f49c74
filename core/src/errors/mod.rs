//! Domain-specific error types and error handling.

mod types;

pub use types::SignatureError;

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid code length: expected {expected}, got {actual}")]
    InvalidCodeLength { expected: usize, actual: usize },

    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] SignatureError),

    #[error("Code store error: {message}")]
    Store { message: String },

    #[error("Notifier error: {message}")]
    Notifier { message: String },

    #[error("Notifier timed out after {timeout_ms}ms")]
    NotifierTimeout { timeout_ms: u64 },

    #[error("Stored record could not be decoded: {message}")]
    Decode { message: String },

    #[error("Code generation failed: {message}")]
    CodeGeneration { message: String },

    #[error("No verification code issued for recipient")]
    CodeNotFound,

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// Whether the error was caused by the caller rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DomainError::Validation { .. }
                | DomainError::InvalidCodeLength { .. }
                | DomainError::Unauthorized(_)
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
