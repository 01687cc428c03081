//! # Server Configuration
//!
//! Probe/metrics server settings loaded from environment variables.

use super::env_var_or_default;
use crate::constants::{DEFAULT_PROBE_PORT, PROBE_PORT_ENV};

/// HTTP server configuration
///
/// All settings have sensible defaults and can be overridden via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP server port for metrics and health probes
    pub probe_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            probe_port: DEFAULT_PROBE_PORT,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            probe_port: env_var_or_default(&lookup, PROBE_PORT_ENV, DEFAULT_PROBE_PORT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port() {
        assert_eq!(ServerConfig::from_lookup(|_| None).probe_port, DEFAULT_PROBE_PORT);
    }

    #[test]
    fn test_port_override() {
        let config = ServerConfig::from_lookup(|key| {
            (key == PROBE_PORT_ENV).then(|| "9100".to_string())
        });
        assert_eq!(config.probe_port, 9100);
    }
}
