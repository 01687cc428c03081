//! # Secret Store Providers
//!
//! Backends the bootstrap can fetch its secret bundle from:
//! - `aws`: AWS Secrets Manager (production)
//! - `file`: JSON files in a local directory (development, tests)
//!
//! The pipeline only sees the [`SecretStore`] trait, so adding a backend does
//! not touch parsing, validation or publication.

pub mod aws;
pub mod file;

pub use aws::AwsSecretManager;
pub use file::FileSecretStore;

use crate::config::{BootstrapConfig, StoreBackend};
use crate::error::BootstrapError;
use crate::secrets::RawPayload;
use async_trait::async_trait;
use tracing::info;

/// Named-secret lookup.
///
/// Implementations make exactly one attempt and must never log the payload.
#[async_trait]
pub trait SecretStore: Send + Sync + std::fmt::Debug {
    /// Short backend label for logs and metrics
    fn backend(&self) -> &'static str;

    /// Fetch the raw payload stored under `name`
    ///
    /// # Errors
    ///
    /// - [`BootstrapError::StoreUnavailable`] on transport or auth failure
    /// - [`BootstrapError::SecretNotFound`] if `name` does not exist
    /// - [`BootstrapError::EmptyPayload`] if the store returned no content
    async fn fetch_secret(&self, name: &str) -> Result<RawPayload, BootstrapError>;
}

/// Create the store selected by `config`
pub async fn create_store(config: &BootstrapConfig) -> Box<dyn SecretStore> {
    match config.backend {
        StoreBackend::Aws => {
            info!("Using AWS Secrets Manager secret store");
            Box::new(
                AwsSecretManager::new(config.aws_region.as_deref(), config.endpoint_url.as_deref())
                    .await,
            )
        }
        StoreBackend::File => {
            info!(
                "Using file secret store rooted at {}",
                config.secrets_dir.display()
            );
            Box::new(FileSecretStore::new(config.secrets_dir.clone()))
        }
    }
}
