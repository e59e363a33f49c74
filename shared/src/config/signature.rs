//! Request signature configuration

use serde::{Deserialize, Serialize};

/// Digest used to derive the signature from `timestamp + secret`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum DigestAlgorithm {
    /// `md5(timestamp + secret)`, understood by existing clients
    #[default]
    #[serde(rename = "md5")]
    Md5,
    /// `sha256(timestamp + secret)`
    #[serde(rename = "sha256")]
    Sha256,
    /// `HMAC-SHA256(key = secret, message = timestamp)`
    #[serde(rename = "hmac-sha256")]
    HmacSha256,
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DigestAlgorithm::Md5 => write!(f, "md5"),
            DigestAlgorithm::Sha256 => write!(f, "sha256"),
            DigestAlgorithm::HmacSha256 => write!(f, "hmac-sha256"),
        }
    }
}

/// Signed-request authentication settings
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SignatureConfig {
    /// Request header carrying `<timestamp>,<hex digest>`
    pub header_name: String,

    /// Shared secret; required
    pub secret_key: String,

    /// Digest algorithm
    pub algorithm: DigestAlgorithm,

    /// Oldest accepted timestamp, in seconds before now
    pub max_age_seconds: i64,

    /// Newest accepted timestamp, in seconds after now
    pub max_future_skew_seconds: i64,
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            header_name: String::from("X-Sms-Signature"),
            secret_key: String::new(),
            algorithm: DigestAlgorithm::Md5,
            max_age_seconds: 60,
            max_future_skew_seconds: 10,
        }
    }
}

impl std::fmt::Debug for SignatureConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureConfig")
            .field("header_name", &self.header_name)
            .field("secret_key", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("max_age_seconds", &self.max_age_seconds)
            .field("max_future_skew_seconds", &self.max_future_skew_seconds)
            .finish()
    }
}

impl SignatureConfig {
    /// Create a configuration with the given secret and default settings
    pub fn with_secret(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            ..Default::default()
        }
    }

    /// Validate signature settings
    pub fn validate(&self) -> Result<(), String> {
        if self.secret_key.is_empty() {
            return Err("signature.secret_key must be set".to_string());
        }
        if self.header_name.trim().is_empty() {
            return Err("signature.header_name must not be empty".to_string());
        }
        if self.max_age_seconds < 0 || self.max_future_skew_seconds < 0 {
            return Err("signature time windows must not be negative".to_string());
        }
        Ok(())
    }
}
