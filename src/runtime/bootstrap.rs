//! # Bootstrap Pipeline
//!
//! Drives one run of fetch → parse → validate → decode → publish and tracks
//! which phase the run reached. No phase is retried; the first error moves
//! the run to [`BootstrapPhase::Failed`] and is returned to the caller.

use crate::constants::SECRETS_NAME_ENV;
use crate::error::BootstrapError;
use crate::observability::metrics;
use crate::provider::SecretStore;
use crate::secrets::{self, ConfigRegistry, PublishedConfig, SecretBundle, SecretMapping};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, info_span, Instrument};

/// Phase reached by a bootstrap run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapPhase {
    Uninitialized,
    Fetched,
    Parsed,
    Validated,
    Decoded,
    Published,
    Failed,
}

impl BootstrapPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            BootstrapPhase::Uninitialized => "uninitialized",
            BootstrapPhase::Fetched => "fetched",
            BootstrapPhase::Parsed => "parsed",
            BootstrapPhase::Validated => "validated",
            BootstrapPhase::Decoded => "decoded",
            BootstrapPhase::Published => "published",
            BootstrapPhase::Failed => "failed",
        }
    }

    /// `Published` and `Failed` end a run
    pub fn is_terminal(&self) -> bool {
        matches!(self, BootstrapPhase::Published | BootstrapPhase::Failed)
    }
}

/// Trimmed secret identifier, or `MissingIdentifier` when unset or blank.
///
/// Callers must run this before building a store client: some clients probe
/// the network while loading their own configuration.
pub fn resolve_secret_name(secret_name: Option<&str>) -> Result<&str, BootstrapError> {
    secret_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| BootstrapError::MissingIdentifier {
            variable: SECRETS_NAME_ENV.to_string(),
        })
}

/// Count a failed run and log it with remediation text
pub(crate) fn record_failure(error: &BootstrapError, last_phase: BootstrapPhase) {
    metrics::increment_bootstrap_failures(error.reason());
    error!(
        reason = error.reason(),
        last_phase = last_phase.as_str(),
        error = %error,
        "bootstrap.failed"
    );
    error!("Remediation: {}", error.remediation());
}

/// One bootstrap run against a store, a mapping table and a registry
#[derive(Debug)]
pub struct Bootstrap<'a> {
    store: &'a dyn SecretStore,
    mapping: &'a SecretMapping,
    registry: &'a ConfigRegistry,
    fetch_timeout: Duration,
    phase: BootstrapPhase,
}

impl<'a> Bootstrap<'a> {
    pub fn new(
        store: &'a dyn SecretStore,
        mapping: &'a SecretMapping,
        registry: &'a ConfigRegistry,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            store,
            mapping,
            registry,
            fetch_timeout,
            phase: BootstrapPhase::Uninitialized,
        }
    }

    pub fn phase(&self) -> BootstrapPhase {
        self.phase
    }

    /// Run the pipeline once.
    ///
    /// A missing or blank `secret_name` fails before the store is touched.
    pub async fn run(
        &mut self,
        secret_name: Option<&str>,
    ) -> Result<Arc<PublishedConfig>, BootstrapError> {
        let span = info_span!(
            "bootstrap.run",
            secret.name = secret_name.unwrap_or(""),
            store.backend = self.store.backend()
        );

        async move {
            metrics::increment_bootstrap_attempts();
            match self.run_phases(secret_name).await {
                Ok(config) => {
                    metrics::increment_bootstrap_success();
                    metrics::set_published_entries(config.len());
                    info!(
                        entries = config.len(),
                        "bootstrap.success"
                    );
                    Ok(config)
                }
                Err(e) => {
                    let failed_after = self.phase;
                    self.phase = BootstrapPhase::Failed;
                    record_failure(&e, failed_after);
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run_phases(
        &mut self,
        secret_name: Option<&str>,
    ) -> Result<Arc<PublishedConfig>, BootstrapError> {
        let secret_name = resolve_secret_name(secret_name)?;

        let payload = tokio::time::timeout(self.fetch_timeout, self.store.fetch_secret(secret_name))
            .await
            .map_err(|elapsed| {
                BootstrapError::store_unavailable(
                    secret_name,
                    format!(
                        "fetch did not complete within {}s ({elapsed})",
                        self.fetch_timeout.as_secs_f64()
                    ),
                )
            })??;
        if payload.is_blank() {
            return Err(BootstrapError::empty_payload(secret_name));
        }
        self.advance(BootstrapPhase::Fetched);

        let bundle = SecretBundle::parse(&payload)?;
        drop(payload);
        self.advance(BootstrapPhase::Parsed);
        info!(keys = bundle.len(), "parsed secret bundle");

        secrets::validate(&bundle, self.mapping)?;
        self.advance(BootstrapPhase::Validated);

        let config = secrets::decode_all(bundle, self.mapping)?;
        self.advance(BootstrapPhase::Decoded);

        let config = secrets::install_decoded(config, self.registry)?;
        self.advance(BootstrapPhase::Published);

        Ok(config)
    }

    fn advance(&mut self, next: BootstrapPhase) {
        info!(
            from = self.phase.as_str(),
            to = next.as_str(),
            "bootstrap.phase"
        );
        self.phase = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::RawPayload;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct StaticStore {
        payload: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SecretStore for StaticStore {
        fn backend(&self) -> &'static str {
            "static"
        }

        async fn fetch_secret(&self, _name: &str) -> Result<RawPayload, BootstrapError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RawPayload::new(self.payload))
        }
    }

    #[derive(Debug)]
    struct StalledStore;

    #[async_trait]
    impl SecretStore for StalledStore {
        fn backend(&self) -> &'static str {
            "stalled"
        }

        async fn fetch_secret(&self, _name: &str) -> Result<RawPayload, BootstrapError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(RawPayload::new("{}"))
        }
    }

    const COMPLETE: &str = r#"{"openai_key":"sk-abc","github_app_id":"123","github_webhook_secret":"whsec","github_private_key":"LS0tLS1CRUdJTiBLRVktLS0tLQ=="}"#;

    #[tokio::test]
    async fn test_phases_reach_published() {
        let store = StaticStore {
            payload: COMPLETE,
            calls: AtomicUsize::new(0),
        };
        let mapping = SecretMapping::reference();
        let registry = ConfigRegistry::new();
        let mut bootstrap = Bootstrap::new(&store, &mapping, &registry, Duration::from_secs(5));
        assert_eq!(bootstrap.phase(), BootstrapPhase::Uninitialized);

        let config = bootstrap.run(Some("prod-secrets")).await.unwrap();

        assert_eq!(bootstrap.phase(), BootstrapPhase::Published);
        assert!(bootstrap.phase().is_terminal());
        assert_eq!(
            config.get("DYNACONF_GITHUB__PRIVATE_KEY"),
            Some("-----BEGIN KEY-----")
        );
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_blank_identifier_fails_without_fetch() {
        let store = StaticStore {
            payload: COMPLETE,
            calls: AtomicUsize::new(0),
        };
        let mapping = SecretMapping::reference();
        let registry = ConfigRegistry::new();
        let mut bootstrap = Bootstrap::new(&store, &mapping, &registry, Duration::from_secs(5));

        let err = bootstrap.run(Some("   ")).await.unwrap_err();

        assert!(matches!(err, BootstrapError::MissingIdentifier { .. }));
        assert_eq!(bootstrap.phase(), BootstrapPhase::Failed);
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_payload_is_empty_payload() {
        let store = StaticStore {
            payload: "   ",
            calls: AtomicUsize::new(0),
        };
        let mapping = SecretMapping::reference();
        let registry = ConfigRegistry::new();
        let mut bootstrap = Bootstrap::new(&store, &mapping, &registry, Duration::from_secs(5));

        let err = bootstrap.run(Some("prod-secrets")).await.unwrap_err();
        assert!(matches!(err, BootstrapError::EmptyPayload { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_timeout_is_store_unavailable() {
        let mapping = SecretMapping::reference();
        let registry = ConfigRegistry::new();
        let mut bootstrap =
            Bootstrap::new(&StalledStore, &mapping, &registry, Duration::from_secs(2));

        let err = bootstrap.run(Some("prod-secrets")).await.unwrap_err();

        match err {
            BootstrapError::StoreUnavailable { message, .. } => {
                assert!(message.contains("within 2s"));
            }
            other => panic!("Expected StoreUnavailable, got {other:?}"),
        }
        assert!(!registry.is_published());
    }

    #[tokio::test]
    async fn test_second_run_fails_at_install() {
        let store = StaticStore {
            payload: COMPLETE,
            calls: AtomicUsize::new(0),
        };
        let mapping = SecretMapping::reference();
        let registry = ConfigRegistry::new();
        Bootstrap::new(&store, &mapping, &registry, Duration::from_secs(5))
            .run(Some("prod-secrets"))
            .await
            .unwrap();

        let mut second = Bootstrap::new(&store, &mapping, &registry, Duration::from_secs(5));
        let err = second.run(Some("prod-secrets")).await.unwrap_err();

        assert!(matches!(err, BootstrapError::AlreadyPublished));
        assert_eq!(second.phase(), BootstrapPhase::Failed);
    }

    #[test]
    fn test_resolve_secret_name() {
        assert_eq!(resolve_secret_name(Some(" prod-secrets ")).unwrap(), "prod-secrets");
        for unset in [None, Some(""), Some(" \t ")] {
            match resolve_secret_name(unset) {
                Err(BootstrapError::MissingIdentifier { variable }) => {
                    assert_eq!(variable, "SECRETS_NAME");
                }
                other => panic!("Expected MissingIdentifier, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_phase_labels() {
        assert_eq!(BootstrapPhase::Validated.as_str(), "validated");
        assert!(!BootstrapPhase::Decoded.is_terminal());
        assert!(BootstrapPhase::Failed.is_terminal());
    }
}
