//! # Bootstrap Configuration
//!
//! Which secret to fetch, from which backend, and how long to wait for it.

use super::{env_var_or_default, flag_enabled};
use crate::constants::{
    AWS_REGION_ENV, BOOTSTRAP_EXPORT_ENV, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_SECRETS_DIR,
    SECRETS_BACKEND_ENV, SECRETS_DIR_ENV, SECRETS_FETCH_TIMEOUT_ENV, SECRETS_MANAGER_ENDPOINT_ENV,
    SECRETS_NAME_ENV,
};
use anyhow::{bail, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Secret store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// AWS Secrets Manager
    #[default]
    Aws,
    /// JSON files in a local directory
    File,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aws" | "secretsmanager" | "aws-secrets-manager" => Ok(StoreBackend::Aws),
            "file" | "local" => Ok(StoreBackend::File),
            other => bail!("Unknown secret store backend '{other}'. Expected: aws or file"),
        }
    }
}

/// Bootstrap settings loaded from the environment
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Secret identifier; `None` aborts the bootstrap before any store call
    pub secret_name: Option<String>,
    /// Store backend to fetch from
    pub backend: StoreBackend,
    /// Root directory for the file backend
    pub secrets_dir: PathBuf,
    /// AWS region override (default credential/region chain when unset)
    pub aws_region: Option<String>,
    /// Secrets Manager endpoint override (localstack, mock servers)
    pub endpoint_url: Option<String>,
    /// Upper bound for the single fetch attempt
    pub fetch_timeout: Duration,
    /// Also export published values as process environment variables
    pub export_env: bool,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            secret_name: None,
            backend: StoreBackend::default(),
            secrets_dir: PathBuf::from(DEFAULT_SECRETS_DIR),
            aws_region: None,
            endpoint_url: None,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            export_env: false,
        }
    }
}

impl BootstrapConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary lookup (tests pass a map)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match non_empty(SECRETS_BACKEND_ENV) {
            Some(value) => value.parse()?,
            None => StoreBackend::default(),
        };

        Ok(Self {
            secret_name: non_empty(SECRETS_NAME_ENV).map(|v| v.trim().to_string()),
            backend,
            secrets_dir: non_empty(SECRETS_DIR_ENV)
                .map_or_else(|| PathBuf::from(DEFAULT_SECRETS_DIR), PathBuf::from),
            aws_region: non_empty(AWS_REGION_ENV),
            endpoint_url: non_empty(SECRETS_MANAGER_ENDPOINT_ENV),
            fetch_timeout: Duration::from_secs(env_var_or_default(
                &lookup,
                SECRETS_FETCH_TIMEOUT_ENV,
                DEFAULT_FETCH_TIMEOUT_SECS,
            )),
            export_env: lookup(BOOTSTRAP_EXPORT_ENV).is_some_and(|v| flag_enabled(&v)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<BootstrapConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        BootstrapConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert!(config.secret_name.is_none());
        assert_eq!(config.backend, StoreBackend::Aws);
        assert_eq!(config.secrets_dir, PathBuf::from(DEFAULT_SECRETS_DIR));
        assert_eq!(
            config.fetch_timeout,
            Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS)
        );
        assert!(!config.export_env);
    }

    #[test]
    fn test_blank_secret_name_is_missing() {
        let config = load(&[("SECRETS_NAME", "   ")]).unwrap();
        assert!(config.secret_name.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SECRETS_NAME", "prod-secrets"),
            ("SECRETS_BACKEND", "file"),
            ("SECRETS_DIR", "/run/secrets"),
            ("AWS_REGION", "eu-west-1"),
            ("SECRETS_MANAGER_ENDPOINT", "http://localhost:4566"),
            ("SECRETS_FETCH_TIMEOUT_SECS", "5"),
            ("BOOTSTRAP_EXPORT_ENV", "true"),
        ])
        .unwrap();
        assert_eq!(config.secret_name.as_deref(), Some("prod-secrets"));
        assert_eq!(config.backend, StoreBackend::File);
        assert_eq!(config.secrets_dir, PathBuf::from("/run/secrets"));
        assert_eq!(config.aws_region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:4566"));
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
        assert!(config.export_env);
    }

    #[test]
    fn test_unparseable_timeout_falls_back_to_default() {
        let config = load(&[("SECRETS_FETCH_TIMEOUT_SECS", "soon")]).unwrap();
        assert_eq!(
            config.fetch_timeout,
            Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let err = load(&[("SECRETS_BACKEND", "vault")]).unwrap_err();
        assert!(err.to_string().contains("vault"));
    }
}
