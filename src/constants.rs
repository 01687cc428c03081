//! # Constants
//!
//! Environment variable names and default values shared by the bootstrap,
//! the probe server and the CLI.

/// Environment variable naming the secret to fetch from the store
pub const SECRETS_NAME_ENV: &str = "SECRETS_NAME";

/// Environment variable selecting the secret store backend (`aws` or `file`)
pub const SECRETS_BACKEND_ENV: &str = "SECRETS_BACKEND";

/// Environment variable pointing at the file backend root directory
pub const SECRETS_DIR_ENV: &str = "SECRETS_DIR";

/// Environment variable overriding the AWS region
pub const AWS_REGION_ENV: &str = "AWS_REGION";

/// Environment variable overriding the Secrets Manager endpoint (localstack, mock servers)
pub const SECRETS_MANAGER_ENDPOINT_ENV: &str = "SECRETS_MANAGER_ENDPOINT";

/// Environment variable bounding the store fetch (seconds)
pub const SECRETS_FETCH_TIMEOUT_ENV: &str = "SECRETS_FETCH_TIMEOUT_SECS";

/// Environment variable enabling export of published values into the process environment
pub const BOOTSTRAP_EXPORT_ENV: &str = "BOOTSTRAP_EXPORT_ENV";

/// Environment variable for the probe server port
pub const PROBE_PORT_ENV: &str = "PROBE_PORT";

/// Default file backend root directory
pub const DEFAULT_SECRETS_DIR: &str = "./secrets";

/// Default store fetch timeout (seconds)
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Default probe server port
pub const DEFAULT_PROBE_PORT: u16 = 8080;

/// Default tracing filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "secret_bootstrap=info";
