//! # Secret Mapping Table
//!
//! Fixed, ordered list of the secret fields a service requires and the
//! configuration names they are published under.

use crate::error::BootstrapError;
use serde::Serialize;
use std::collections::HashSet;

/// Transport encoding applied to a field inside the stored secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldEncoding {
    /// Value is stored as-is
    Plain,
    /// Value is standard base64 of UTF-8 text
    Base64,
}

impl FieldEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldEncoding::Plain => "plain",
            FieldEncoding::Base64 => "base64",
        }
    }
}

/// One (secret key → configuration name) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingEntry {
    /// Field name inside the secret payload
    pub key: String,
    /// Name the decoded value is published under
    pub config_name: String,
    /// Transport encoding of the stored value
    pub encoding: FieldEncoding,
}

impl MappingEntry {
    pub fn plain(key: impl Into<String>, config_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            config_name: config_name.into(),
            encoding: FieldEncoding::Plain,
        }
    }

    pub fn base64(key: impl Into<String>, config_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            config_name: config_name.into(),
            encoding: FieldEncoding::Base64,
        }
    }
}

/// Ordered, duplicate-free mapping table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretMapping {
    entries: Vec<MappingEntry>,
}

impl SecretMapping {
    /// Build a mapping, rejecting duplicate keys, duplicate names and names
    /// that could not be exported as environment variables.
    pub fn new(entries: Vec<MappingEntry>) -> Result<Self, BootstrapError> {
        if entries.is_empty() {
            return Err(BootstrapError::InvalidMapping {
                reason: "mapping table is empty".to_string(),
            });
        }

        let mut keys = HashSet::new();
        let mut names = HashSet::new();
        for entry in &entries {
            if entry.key.is_empty() {
                return Err(BootstrapError::InvalidMapping {
                    reason: format!("empty secret key for '{}'", entry.config_name),
                });
            }
            if !is_valid_config_name(&entry.config_name) {
                return Err(BootstrapError::InvalidMapping {
                    reason: format!(
                        "configuration name '{}' for key '{}' must be non-empty and contain only ASCII letters, digits or '_'",
                        entry.config_name, entry.key
                    ),
                });
            }
            if !keys.insert(entry.key.as_str()) {
                return Err(BootstrapError::InvalidMapping {
                    reason: format!("duplicate secret key '{}'", entry.key),
                });
            }
            if !names.insert(entry.config_name.as_str()) {
                return Err(BootstrapError::InvalidMapping {
                    reason: format!("duplicate configuration name '{}'", entry.config_name),
                });
            }
        }

        Ok(Self { entries })
    }

    /// Mapping used by the reference deployment: LLM API key plus GitHub App credentials
    pub fn reference() -> Self {
        Self {
            entries: vec![
                MappingEntry::plain("openai_key", "DYNACONF_OPENAI__KEY"),
                MappingEntry::plain("github_app_id", "DYNACONF_GITHUB__APP_ID"),
                MappingEntry::plain("github_webhook_secret", "DYNACONF_GITHUB__WEBHOOK_SECRET"),
                MappingEntry::base64("github_private_key", "DYNACONF_GITHUB__PRIVATE_KEY"),
            ],
        }
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &MappingEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the entry for a secret key
    pub fn entry(&self, key: &str) -> Option<&MappingEntry> {
        self.entries.iter().find(|e| e.key == key)
    }
}

fn is_valid_config_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
