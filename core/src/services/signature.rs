//! Signed-request authentication
//!
//! Clients send `<unix_timestamp>,<hex digest>` in a request header. The
//! digest is recomputed over the timestamp text exactly as received plus the
//! shared secret, compared in constant time, and the timestamp must fall
//! inside the freshness window.

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha2::Sha256;
use st_shared::{DigestAlgorithm, SignatureConfig};

use crate::errors::SignatureError;

type HmacSha256 = Hmac<Sha256>;

/// Verifies and produces request signatures
#[derive(Clone)]
pub struct RequestAuthenticator {
    secret: String,
    algorithm: DigestAlgorithm,
    max_age_seconds: i64,
    max_future_skew_seconds: i64,
}

impl RequestAuthenticator {
    pub fn new(config: &SignatureConfig) -> Self {
        Self {
            secret: config.secret_key.clone(),
            algorithm: config.algorithm,
            max_age_seconds: config.max_age_seconds,
            max_future_skew_seconds: config.max_future_skew_seconds,
        }
    }

    /// Lowercase hex digest of `timestamp` under the configured algorithm
    pub fn digest(&self, timestamp: &str) -> String {
        match self.algorithm {
            DigestAlgorithm::Md5 => {
                let mut hasher = Md5::new();
                hasher.update(timestamp.as_bytes());
                hasher.update(self.secret.as_bytes());
                hex::encode(hasher.finalize())
            }
            DigestAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(timestamp.as_bytes());
                hasher.update(self.secret.as_bytes());
                hex::encode(hasher.finalize())
            }
            DigestAlgorithm::HmacSha256 => {
                let mut mac = match HmacSha256::new_from_slice(self.secret.as_bytes()) {
                    Ok(mac) => mac,
                    Err(_) => return String::new(),
                };
                mac.update(timestamp.as_bytes());
                hex::encode(mac.finalize().into_bytes())
            }
        }
    }

    /// Header value for a request made at `timestamp`
    pub fn sign(&self, timestamp: i64) -> String {
        let timestamp = timestamp.to_string();
        let digest = self.digest(&timestamp);
        format!("{},{}", timestamp, digest)
    }

    /// Check a header value against the secret and the clock
    ///
    /// # Arguments
    ///
    /// * `header` - Raw header value, `None` when the header is absent
    /// * `now` - Current unix time in seconds
    ///
    /// # Returns
    ///
    /// * `Ok(i64)` - The accepted timestamp
    /// * `Err(SignatureError)` - Why the request was rejected
    pub fn verify(&self, header: Option<&str>, now: i64) -> Result<i64, SignatureError> {
        let header = header.ok_or(SignatureError::Missing)?;

        let (timestamp_text, provided) = header
            .split_once(',')
            .ok_or(SignatureError::Malformed)?;
        if provided.is_empty() || provided.contains(',') {
            return Err(SignatureError::Malformed);
        }
        let timestamp: i64 = timestamp_text
            .parse()
            .map_err(|_| SignatureError::Malformed)?;

        let expected = self.digest(timestamp_text);
        if expected.is_empty() || !constant_time_eq(expected.as_bytes(), provided.as_bytes()) {
            return Err(SignatureError::DigestMismatch);
        }

        let age = now.saturating_sub(timestamp);
        if age > self.max_age_seconds {
            return Err(SignatureError::Expired { age });
        }
        let skew = timestamp.saturating_sub(now);
        if skew > self.max_future_skew_seconds {
            return Err(SignatureError::FromFuture { skew });
        }

        Ok(timestamp)
    }
}

impl std::fmt::Debug for RequestAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestAuthenticator")
            .field("algorithm", &self.algorithm)
            .field("max_age_seconds", &self.max_age_seconds)
            .field("max_future_skew_seconds", &self.max_future_skew_seconds)
            .finish_non_exhaustive()
    }
}
