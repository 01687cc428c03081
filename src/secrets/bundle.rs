//! # Secret Bundle Parser
//!
//! Turns the raw payload fetched from the store into a key → value map.
//! Both the payload and the bundle wipe their contents when dropped.

use crate::error::BootstrapError;
use serde_json::Value;
use std::collections::HashMap;
use zeroize::Zeroizing;

/// Raw secret payload exactly as returned by the store
pub struct RawPayload(Zeroizing<String>);

impl RawPayload {
    pub fn new(payload: impl Into<String>) -> Self {
        Self(Zeroizing::new(payload.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the store returned nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for RawPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawPayload")
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}

/// Parsed contents of one fetched secret
pub struct SecretBundle {
    values: HashMap<String, Zeroizing<String>>,
}

impl SecretBundle {
    /// Parse a JSON object payload.
    ///
    /// Strings are kept verbatim, numbers and booleans keep their JSON text.
    /// `null`, arrays and nested objects are rejected.
    pub fn parse(payload: &RawPayload) -> Result<Self, BootstrapError> {
        let document: Value = serde_json::from_str(payload.as_str())
            .map_err(|e| BootstrapError::malformed(format!("payload is not valid JSON: {e}")))?;

        let object = match document {
            Value::Object(object) => object,
            other => {
                return Err(BootstrapError::malformed(format!(
                    "expected a JSON object at the top level, found {}",
                    json_kind(&other)
                )));
            }
        };

        let mut values = HashMap::with_capacity(object.len());
        for (key, value) in object {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(BootstrapError::malformed(format!(
                        "value for key '{key}' must be a string, found {}",
                        json_kind(&other)
                    )));
                }
            };
            values.insert(key, Zeroizing::new(text));
        }

        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|v| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::fmt::Debug for SecretBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("SecretBundle")
            .field("keys", &keys)
            .finish_non_exhaustive()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
