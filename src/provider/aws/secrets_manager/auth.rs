//! # AWS Secrets Manager Authentication
//!
//! Handles AWS SDK configuration and authentication setup.

use aws_config::SdkConfig;
use tracing::info;

/// Create AWS SDK config using the default credential chain.
///
/// The chain covers environment credentials, shared profiles, web identity
/// (IRSA) and the Lambda/ECS/EC2 role providers. `region` falls back to the
/// chain's own region lookup when unset.
pub async fn create_sdk_config(region: Option<&str>, endpoint_url: Option<&str>) -> SdkConfig {
    let mut builder = aws_config::defaults(aws_config::BehaviorVersion::latest());

    if let Some(region) = region {
        info!("Using AWS region override: {}", region);
        builder = builder.region(aws_config::Region::new(region.to_string()));
    }

    // Local development: route requests to localstack or a mock server
    if let Some(endpoint) = endpoint_url {
        info!("Routing AWS Secrets Manager requests to {}", endpoint);
        builder = builder.endpoint_url(endpoint);
    }

    builder.load().await
}
