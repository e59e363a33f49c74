//! Request signature rejection reasons

use thiserror::Error;

/// Why a signed request was rejected
///
/// Every variant maps to 401 at the HTTP layer; the distinction is kept
/// for logging.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Signature header is missing")]
    Missing,

    #[error("Signature header is malformed")]
    Malformed,

    #[error("Signature digest does not match")]
    DigestMismatch,

    #[error("Signature timestamp is {age}s old")]
    Expired { age: i64 },

    #[error("Signature timestamp is {skew}s in the future")]
    FromFuture { skew: i64 },
}

impl SignatureError {
    /// Short label used in log events
    pub fn reason(&self) -> &'static str {
        match self {
            SignatureError::Missing => "missing",
            SignatureError::Malformed => "malformed",
            SignatureError::DigestMismatch => "digest_mismatch",
            SignatureError::Expired { .. } => "expired",
            SignatureError::FromFuture { .. } => "from_future",
        }
    }
}
