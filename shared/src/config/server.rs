//! Server configuration module

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    pub workers: usize,

    /// Maximum JSON payload size in bytes
    pub max_payload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8080,
            workers: 0,
            max_payload_size: 16 * 1024,
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Override host and port from a `host:port` or `:port` address
    ///
    /// An empty host keeps the configured one, so `":9000"` only changes the port.
    pub fn apply_address(&mut self, address: &str) -> Result<(), String> {
        let (host, port) = address
            .rsplit_once(':')
            .ok_or_else(|| format!("Address must be host:port, got '{}'", address))?;
        self.port = port
            .parse()
            .map_err(|_| format!("Invalid port in address '{}'", address))?;
        if !host.is_empty() {
            self.host = host.to_string();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.workers, 0);
    }

    #[test]
    fn test_apply_address() {
        let mut config = ServerConfig::default();
        config.apply_address(":9000").unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9000");

        config.apply_address("0.0.0.0:80").unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:80");

        assert!(config.apply_address("localhost").is_err());
        assert!(config.apply_address("localhost:http").is_err());
    }
}
