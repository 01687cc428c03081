//! # Configuration Publisher
//!
//! Builds the immutable [`PublishedConfig`] from a validated bundle and installs
//! it into a write-once [`ConfigRegistry`].
//!
//! Publication is all-or-nothing: every field is decoded before anything is
//! installed, so a decode failure on the last entry leaves the registry empty.

use crate::error::BootstrapError;
use crate::secrets::bundle::SecretBundle;
use crate::secrets::decode::decode_field;
use crate::secrets::mapping::SecretMapping;
use chrono::{DateTime, Utc};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};
use zeroize::Zeroizing;

/// One published configuration value
struct PublishedEntry {
    name: String,
    value: Zeroizing<String>,
}

/// Resolved configuration values, in mapping order.
///
/// Read-only once built. `Debug` prints names only.
pub struct PublishedConfig {
    entries: Vec<PublishedEntry>,
    published_at: DateTime<Utc>,
}

impl PublishedConfig {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value.as_str())
    }

    /// Published names in mapping order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// (name, value) pairs in mapping order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), e.value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }
}

impl std::fmt::Debug for PublishedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishedConfig")
            .field("names", &self.names().collect::<Vec<_>>())
            .field("published_at", &self.published_at)
            .finish_non_exhaustive()
    }
}

/// Write-once holder for the process configuration
#[derive(Debug, Default)]
pub struct ConfigRegistry {
    slot: OnceLock<Arc<PublishedConfig>>,
}

static GLOBAL_REGISTRY: ConfigRegistry = ConfigRegistry::new();

impl ConfigRegistry {
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// Process-wide registry filled by the composition root
    pub fn global() -> &'static ConfigRegistry {
        &GLOBAL_REGISTRY
    }

    /// Install the configuration; fails if one is already installed
    pub fn install(&self, config: PublishedConfig) -> Result<Arc<PublishedConfig>, BootstrapError> {
        let config = Arc::new(config);
        self.slot
            .set(Arc::clone(&config))
            .map_err(|_rejected| BootstrapError::AlreadyPublished)?;
        Ok(config)
    }

    pub fn get(&self) -> Option<Arc<PublishedConfig>> {
        self.slot.get().cloned()
    }

    pub fn is_published(&self) -> bool {
        self.slot.get().is_some()
    }
}

/// Decode every mapped field; nothing is published unless all succeed.
///
/// Consumes the bundle so raw values are wiped as soon as decoding finishes.
/// Callers must run completeness validation first.
pub fn decode_all(
    bundle: SecretBundle,
    mapping: &SecretMapping,
) -> Result<PublishedConfig, BootstrapError> {
    let mut entries = Vec::with_capacity(mapping.len());
    for entry in mapping.iter() {
        let raw_value = bundle.get(&entry.key).ok_or_else(|| {
            BootstrapError::IncompleteSecret {
                missing_keys: vec![entry.key.clone()],
            }
        })?;
        let value = decode_field(&entry.key, entry.encoding, raw_value)?;
        debug!(
            secret.key = %entry.key,
            config.name = %entry.config_name,
            encoding = entry.encoding.as_str(),
            "decoded secret field"
        );
        entries.push(PublishedEntry {
            name: entry.config_name.clone(),
            value,
        });
    }
    drop(bundle);

    Ok(PublishedConfig {
        entries,
        published_at: Utc::now(),
    })
}

/// Decode all fields, then install the result into `registry`
pub fn publish(
    bundle: SecretBundle,
    mapping: &SecretMapping,
    registry: &ConfigRegistry,
) -> Result<Arc<PublishedConfig>, BootstrapError> {
    let config = decode_all(bundle, mapping)?;
    install_decoded(config, registry)
}

/// Install a fully decoded configuration and log what was published
pub fn install_decoded(
    config: PublishedConfig,
    registry: &ConfigRegistry,
) -> Result<Arc<PublishedConfig>, BootstrapError> {
    let config = registry.install(config)?;
    info!(
        entries = config.len(),
        "published configuration: {}",
        config.names().collect::<Vec<_>>().join(", ")
    );
    Ok(config)
}

/// Export every published entry into the process environment.
///
/// For consumers that still read configuration from environment variables.
/// `set_var` races with concurrent environment reads, so this must run while
/// the calling thread is the only one in the process: no tokio runtime alive.
pub fn export_to_env(config: &PublishedConfig) {
    for (name, value) in config.iter() {
        std::env::set_var(name, value);
    }
    info!(entries = config.len(), "exported published configuration to process environment");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::bundle::RawPayload;
    use crate::secrets::mapping::MappingEntry;
    use base64::Engine as _;

    fn bundle(json: &str) -> SecretBundle {
        SecretBundle::parse(&RawPayload::new(json)).unwrap()
    }

    fn reference_payload(private_key: &str) -> String {
        serde_json::json!({
            "openai_key": "sk-abc",
            "github_app_id": "123",
            "github_webhook_secret": "whsec",
            "github_private_key": private_key,
        })
        .to_string()
    }

    #[test]
    fn test_publish_all_entries_in_mapping_order() {
        let encoded = base64::engine::general_purpose::STANDARD.encode("-----BEGIN KEY-----");
        let registry = ConfigRegistry::new();
        let mapping = SecretMapping::reference();

        let config = publish(bundle(&reference_payload(&encoded)), &mapping, &registry).unwrap();

        assert_eq!(config.len(), mapping.len());
        assert_eq!(
            config.names().collect::<Vec<_>>(),
            vec![
                "DYNACONF_OPENAI__KEY",
                "DYNACONF_GITHUB__APP_ID",
                "DYNACONF_GITHUB__WEBHOOK_SECRET",
                "DYNACONF_GITHUB__PRIVATE_KEY",
            ]
        );
        assert_eq!(config.get("DYNACONF_OPENAI__KEY"), Some("sk-abc"));
        assert_eq!(
            config.get("DYNACONF_GITHUB__PRIVATE_KEY"),
            Some("-----BEGIN KEY-----")
        );
        assert!(registry.is_published());
    }

    #[test]
    fn test_decode_failure_leaves_registry_empty() {
        let registry = ConfigRegistry::new();
        let result = publish(
            bundle(&reference_payload("%%% not base64 %%%")),
            &SecretMapping::reference(),
            &registry,
        );

        assert!(matches!(result, Err(BootstrapError::Decode { ref key, .. }) if key == "github_private_key"));
        assert!(!registry.is_published());
        assert!(registry.get().is_none());
    }

    #[test]
    fn test_failure_on_first_entry_decodes_nothing_further() {
        let mapping = SecretMapping::new(vec![
            MappingEntry::base64("first", "FIRST"),
            MappingEntry::plain("second", "SECOND"),
        ])
        .unwrap();
        let result = decode_all(bundle(r#"{"first":"@@","second":"ok"}"#), &mapping);
        assert!(matches!(result, Err(BootstrapError::Decode { ref key, .. }) if key == "first"));
    }

    #[test]
    fn test_registry_is_write_once() {
        let registry = ConfigRegistry::new();
        let mapping = SecretMapping::new(vec![MappingEntry::plain("a", "NAME_A")]).unwrap();

        let first = publish(bundle(r#"{"a":"one"}"#), &mapping, &registry).unwrap();
        let second = publish(bundle(r#"{"a":"two"}"#), &mapping, &registry);

        assert!(matches!(second, Err(BootstrapError::AlreadyPublished)));
        let installed = registry.get().unwrap();
        assert!(Arc::ptr_eq(&first, &installed));
        assert_eq!(installed.get("NAME_A"), Some("one"));
    }

    #[test]
    fn test_debug_output_hides_values() {
        let registry = ConfigRegistry::new();
        let mapping = SecretMapping::new(vec![MappingEntry::plain("a", "NAME_A")]).unwrap();
        let config = publish(bundle(r#"{"a":"hunter2"}"#), &mapping, &registry).unwrap();

        let rendered = format!("{config:?}");
        assert!(rendered.contains("NAME_A"));
        assert!(!rendered.contains("hunter2"));
    }
}
