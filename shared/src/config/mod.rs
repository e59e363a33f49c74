//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `cache` - Code store backend and Redis connection
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server binding
//! - `signature` - Request signature verification
//! - `sms` - Outbound SMS transport
//! - `token` - Verification code issuance rules
//!
//! Values are layered: built-in defaults, then an optional config file
//! (TOML or JSON, chosen by extension), then `SMSTOKEN__`-prefixed
//! environment variables such as `SMSTOKEN__TOKEN__TOKEN_LENGTH=6`.

pub mod cache;
pub mod environment;
pub mod server;
pub mod signature;
pub mod sms;
pub mod token;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use cache::{CacheBackend, CacheConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;
pub use signature::{DigestAlgorithm, SignatureConfig};
pub use sms::{SmsConfig, SmsProvider};
pub use token::{ResendExpiryPolicy, TokenConfig};

/// Prefix of environment variables that override configuration values
pub const ENV_PREFIX: &str = "SMSTOKEN";

/// Separator between prefix, section and key in environment variable names
pub const ENV_SEPARATOR: &str = "__";

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Code store configuration
    pub cache: CacheConfig,

    /// Verification code issuance rules
    pub token: TokenConfig,

    /// Request signature configuration
    pub signature: SignatureConfig,

    /// SMS transport configuration
    pub sms: SmsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from defaults, an optional file and the environment
    ///
    /// # Arguments
    ///
    /// * `path` - Optional configuration file; it must exist when given
    ///
    /// # Returns
    ///
    /// * `Ok(AppConfig)` - The merged configuration (not yet validated)
    /// * `Err(ConfigError)` - If a source cannot be read or deserialized
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        // Logging values left unset fall back to the environment's defaults
        let environment = match settings.get::<Environment>("environment") {
            Ok(environment) => environment,
            Err(config::ConfigError::NotFound(_)) => Environment::default(),
            Err(e) => return Err(e.into()),
        };
        let logging = LoggingConfig::for_environment(environment);

        let settings = config::Config::builder()
            .set_default("logging.level", logging.level)?
            .set_default("logging.format", logging.format.as_str())?
            .add_source(settings)
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Check cross-field constraints before the server starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.token.validate().map_err(ConfigError::Invalid)?;
        self.signature.validate().map_err(ConfigError::Invalid)?;
        self.sms.validate().map_err(ConfigError::Invalid)?;

        if self.environment.is_production() && self.sms.provider == SmsProvider::Mock {
            return Err(ConfigError::Invalid(
                "sms.provider = mock is not allowed in production".to_string(),
            ));
        }
        Ok(())
    }
}
