//! # AWS Secrets Manager Client
//!
//! Client for interacting with AWS Secrets Manager API.
//!
//! This module provides functionality to:
//! - Retrieve the `SecretString` of a named secret
//! - Classify SDK failures into bootstrap error kinds
//! - Use the default AWS credential chain (IRSA, Lambda/ECS roles, profiles)

mod auth;

use aws_sdk_secretsmanager::error::{DisplayErrorContext, SdkError};
use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueError;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, info_span, Instrument};

use crate::error::BootstrapError;
use crate::observability::metrics;
use crate::provider::SecretStore;
use crate::secrets::RawPayload;

use self::auth::create_sdk_config;

/// AWS Secrets Manager provider implementation
pub struct AwsSecretManager {
    pub(crate) client: SecretsManagerClient,
    pub(crate) region: Option<String>,
}

impl std::fmt::Debug for AwsSecretManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSecretManager")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl AwsSecretManager {
    /// Create a new AWS Secrets Manager client from the default credential chain
    pub async fn new(region: Option<&str>, endpoint_url: Option<&str>) -> Self {
        let sdk_config = create_sdk_config(region, endpoint_url).await;
        let region = sdk_config.region().map(ToString::to_string);
        let client = SecretsManagerClient::new(&sdk_config);

        Self { client, region }
    }
}

#[async_trait]
impl SecretStore for AwsSecretManager {
    fn backend(&self) -> &'static str {
        "aws"
    }

    async fn fetch_secret(&self, name: &str) -> Result<RawPayload, BootstrapError> {
        let span = info_span!(
            "aws.secretsmanager.secret.get",
            secret.name = name,
            region = self.region.as_deref().unwrap_or("default")
        );
        let start = Instant::now();

        async move {
            let result = self.client.get_secret_value().secret_id(name).send().await;
            metrics::observe_fetch_duration("aws", start.elapsed().as_secs_f64());

            match result {
                Ok(output) => {
                    debug!(
                        version_id = output.version_id().unwrap_or("unknown"),
                        "fetched secret from AWS Secrets Manager"
                    );
                    match output.secret_string() {
                        Some(payload) if !payload.trim().is_empty() => Ok(RawPayload::new(payload)),
                        _ => Err(BootstrapError::empty_payload(name)),
                    }
                }
                Err(e) => Err(classify_get_secret_error(name, &e)),
            }
        }
        .instrument(span)
        .await
    }
}

/// Map an SDK failure onto the bootstrap error taxonomy
fn classify_get_secret_error(
    name: &str,
    error: &SdkError<GetSecretValueError>,
) -> BootstrapError {
    if error
        .as_service_error()
        .is_some_and(GetSecretValueError::is_resource_not_found_exception)
    {
        return BootstrapError::secret_not_found(name);
    }
    BootstrapError::store_unavailable(name, DisplayErrorContext(error).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_store_unavailable() {
        let error: SdkError<GetSecretValueError> =
            SdkError::timeout_error("connection timed out");
        match classify_get_secret_error("prod-secrets", &error) {
            BootstrapError::StoreUnavailable {
                secret_name,
                message,
            } => {
                assert_eq!(secret_name, "prod-secrets");
                assert!(!message.is_empty());
            }
            other => panic!("Expected StoreUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_construction_failure_is_store_unavailable() {
        let error: SdkError<GetSecretValueError> =
            SdkError::construction_failure("missing region");
        assert_eq!(
            classify_get_secret_error("prod-secrets", &error).reason(),
            "store_unavailable"
        );
    }

    #[tokio::test]
    async fn test_client_uses_region_override() {
        let store = AwsSecretManager::new(Some("eu-west-1"), Some("http://127.0.0.1:1")).await;
        assert_eq!(store.region.as_deref(), Some("eu-west-1"));
        assert_eq!(store.backend(), "aws");
        assert!(format!("{store:?}").contains("eu-west-1"));
    }
}
