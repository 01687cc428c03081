//! # AWS Providers
//!
//! - `secrets_manager`: AWS Secrets Manager for the bootstrap secret bundle

pub mod secrets_manager;

// Re-export for convenience
pub use secrets_manager::AwsSecretManager;
