//! Command line arguments, configuration loading and tracing setup

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use st_shared::{AppConfig, LogFormat, LoggingConfig};

/// SMS token service
#[derive(Debug, Clone, Parser)]
#[command(name = "st_api", version, about)]
pub struct Args {
    /// Configuration file (TOML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Listen address, `host:port` or `:port`
    #[arg(long)]
    pub addr: Option<String>,

    /// Redis connection URL
    #[arg(long)]
    pub redis: Option<String>,
}

/// Load configuration from file and environment, apply CLI overrides, validate
pub fn load_config(args: &Args) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(addr) = &args.addr {
        config
            .server
            .apply_address(addr)
            .map_err(anyhow::Error::msg)?;
    }
    if let Some(url) = &args.redis {
        config.cache.url = url.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `logging.level`.
pub fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .context("Invalid log filter")?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}
