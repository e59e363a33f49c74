//! Verification record entity, one per recipient.

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};

/// Bytes at or above this value are discarded so `byte % 10` stays uniform
const DIGIT_REJECTION_BOUND: u8 = 250;

/// Last-issued verification code for a recipient
///
/// Serialized with the field names used by deployed stores:
/// `{"From", "To", "Text", "Token", "LastSendAt"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Sender identity shown on the outbound message
    #[serde(rename = "From")]
    pub originator: String,

    /// Phone number the code was sent to; also the store key
    #[serde(rename = "To")]
    pub recipient: String,

    /// Text placed in front of the code
    #[serde(rename = "Text")]
    pub message_template: String,

    /// Fixed-length numeric code
    #[serde(rename = "Token")]
    pub code: String,

    /// Time of the most recent dispatch
    #[serde(rename = "LastSendAt")]
    pub issued_at: DateTime<Utc>,
}

impl VerificationRecord {
    /// Creates a record for a freshly generated code
    pub fn new(
        recipient: impl Into<String>,
        originator: impl Into<String>,
        message_template: impl Into<String>,
        code: impl Into<String>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            originator: originator.into(),
            recipient: recipient.into(),
            message_template: message_template.into(),
            code: code.into(),
            issued_at,
        }
    }

    /// Generates a code of `length` decimal digits from the OS CSPRNG
    ///
    /// Uses rejection sampling so every digit is uniformly distributed.
    pub fn generate_code(length: usize) -> Result<String, rand::Error> {
        let mut code = String::with_capacity(length);
        let mut buffer = [0u8; 32];

        while code.len() < length {
            OsRng.try_fill_bytes(&mut buffer)?;
            for byte in buffer {
                if byte >= DIGIT_REJECTION_BOUND {
                    continue;
                }
                code.push(char::from(b'0' + byte % 10));
                if code.len() == length {
                    break;
                }
            }
        }

        Ok(code)
    }

    /// Checks that `code` has exactly `length` ASCII digits
    pub fn is_well_formed_code(code: &str, length: usize) -> bool {
        code.len() == length && code.bytes().all(|b| b.is_ascii_digit())
    }

    /// Full text of the outbound message
    pub fn message(&self) -> String {
        format!("{}{}", self.message_template, self.code)
    }

    /// Whole seconds since the last dispatch, truncated toward zero
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        (now - self.issued_at).num_seconds()
    }

    /// Copy of this record re-dispatched at `now`
    ///
    /// `issued_at` always moves forward, even if the clock did not.
    pub fn resent_at(&self, now: DateTime<Utc>) -> Self {
        let issued_at = if now > self.issued_at {
            now
        } else {
            self.issued_at + Duration::microseconds(1)
        };

        Self {
            issued_at,
            ..self.clone()
        }
    }

    /// Serializes the record for the store
    pub fn encode(&self) -> DomainResult<String> {
        serde_json::to_string(self).map_err(|e| DomainError::Internal {
            message: format!("Failed to encode verification record: {}", e),
        })
    }

    /// Parses a record read from the store
    pub fn decode(raw: &str) -> DomainResult<Self> {
        serde_json::from_str(raw).map_err(|e| DomainError::Decode {
            message: e.to_string(),
        })
    }
}
