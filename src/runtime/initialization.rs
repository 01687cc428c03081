//! # Initialization
//!
//! Process startup: rustls setup, tracing, metrics, configuration loading and
//! the secret bootstrap. Nothing here binds a listener; `main` starts the probe
//! server only after [`initialize`] returned successfully.

use crate::config::{BootstrapConfig, ServerConfig};
use crate::constants::DEFAULT_LOG_FILTER;
use crate::observability::metrics;
use crate::provider::create_store;
use crate::runtime::bootstrap::{record_failure, resolve_secret_name, Bootstrap, BootstrapPhase};
use crate::secrets::{export_to_env, ConfigRegistry, PublishedConfig, SecretMapping};
use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

const STARTUP_FAILURE: &str = "Critical error loading secrets; refusing to start";

/// Initialization result containing everything the service needs to start
#[derive(Debug)]
pub struct InitializationResult {
    /// Configuration published by the bootstrap
    pub published: Arc<PublishedConfig>,
    /// Probe server settings
    pub server_config: ServerConfig,
    /// Legacy environment export requested; see [`export_published_env`]
    pub export_env: bool,
}

/// Load `.env`, then install the tracing subscriber and the rustls crypto provider.
///
/// `.env` loading sets environment variables, so call this before any tokio
/// runtime is built. Safe to call more than once; later calls keep the first
/// provider/subscriber.
pub fn init_process() {
    // Loaded first so RUST_LOG from .env applies to the subscriber
    let dotenv_result = dotenvy::dotenv();

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .try_init()
    {
        warn!("Tracing subscriber init returned error (may already be initialized): {}", e);
    }

    if let Err(e) = dotenv_result {
        if !e.not_found() {
            warn!("Ignoring unreadable .env file: {}", e);
        }
    }

    // Required for rustls 0.23+ when no default provider is set via features
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("rustls crypto provider was already installed");
    }
}

/// Initialize the service: run the secret bootstrap and publish into the
/// process-wide registry.
///
/// Expects [`init_process`] to have run. This handles:
/// - Metrics registration
/// - Configuration loading
/// - Secret store creation and the bootstrap run
///
/// Environment export is left to [`export_published_env`], which needs a
/// process without runtime threads.
pub async fn initialize() -> Result<InitializationResult> {
    info!("Starting secret bootstrap v{}", env!("CARGO_PKG_VERSION"));

    metrics::register_metrics()?;

    let bootstrap_config =
        BootstrapConfig::from_env().context("Failed to load bootstrap configuration")?;
    let server_config = ServerConfig::from_env();

    let published = run_bootstrap(
        &bootstrap_config,
        &SecretMapping::reference(),
        ConfigRegistry::global(),
    )
    .await?;

    info!("Bootstrap complete, service may start accepting traffic");

    Ok(InitializationResult {
        published,
        server_config,
        export_env: bootstrap_config.export_env,
    })
}

/// Export published values into the process environment when requested.
///
/// Call only after the runtime that ran [`initialize`] has been dropped and
/// before the serving runtime is built.
pub fn export_published_env(result: &InitializationResult) {
    if result.export_env {
        export_to_env(&result.published);
    }
}

/// Build the configured store and run the bootstrap once
pub async fn run_bootstrap(
    config: &BootstrapConfig,
    mapping: &SecretMapping,
    registry: &ConfigRegistry,
) -> Result<Arc<PublishedConfig>> {
    // Checked before the store exists: loading the AWS client config can already hit the network
    if let Err(e) = resolve_secret_name(config.secret_name.as_deref()) {
        metrics::increment_bootstrap_attempts();
        record_failure(&e, BootstrapPhase::Uninitialized);
        return Err(anyhow!(e).context(STARTUP_FAILURE));
    }

    let store = create_store(config).await;
    let mut bootstrap = Bootstrap::new(store.as_ref(), mapping, registry, config.fetch_timeout);

    bootstrap
        .run(config.secret_name.as_deref())
        .await
        .map_err(|e| anyhow!(e).context(STARTUP_FAILURE))
}
