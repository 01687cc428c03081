//! # Bootstrap Error Types
//!
//! Every failure the bootstrap can hit, tagged by kind. Nothing here is retried:
//! each variant aborts startup and carries enough detail to fix the deployment.

use thiserror::Error;

/// Why a transport-encoded field could not be decoded
#[derive(Debug, Error)]
pub enum DecodeFailure {
    /// Value is not valid standard base64
    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    /// Decoded bytes are not UTF-8 text
    #[error("decoded value is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Bootstrap failure
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// No secret identifier was supplied
    #[error("secret identifier is not set ({variable} environment variable is missing or empty)")]
    MissingIdentifier { variable: String },

    /// Transport, authentication or timeout failure talking to the store
    #[error("secret store unavailable while fetching '{secret_name}': {message}")]
    StoreUnavailable {
        secret_name: String,
        message: String,
    },

    /// The store has no secret under this identifier
    #[error("secret '{secret_name}' was not found in the secret store")]
    SecretNotFound { secret_name: String },

    /// The store answered without content
    #[error("secret '{secret_name}' has no string payload")]
    EmptyPayload { secret_name: String },

    /// The payload is not a flat JSON object of scalar values
    #[error("secret payload is malformed: {reason}")]
    MalformedPayload { reason: String },

    /// Required keys are absent from the bundle (full list, mapping order)
    #[error("required secrets are missing: {}", missing_keys.join(", "))]
    IncompleteSecret { missing_keys: Vec<String> },

    /// A field marked as encoded failed to decode
    #[error("failed to decode secret field '{key}': {cause}")]
    Decode {
        key: String,
        #[source]
        cause: DecodeFailure,
    },

    /// The mapping table itself is inconsistent
    #[error("invalid secret mapping: {reason}")]
    InvalidMapping { reason: String },

    /// Configuration was already published in this process
    #[error("configuration has already been published for this process")]
    AlreadyPublished,

    /// Anything else, wrapped with context
    #[error("unexpected bootstrap failure: {context}")]
    Unexpected {
        context: String,
        #[source]
        source: anyhow::Error,
    },
}

impl BootstrapError {
    pub fn store_unavailable(secret_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            secret_name: secret_name.into(),
            message: message.into(),
        }
    }

    pub fn secret_not_found(secret_name: impl Into<String>) -> Self {
        Self::SecretNotFound {
            secret_name: secret_name.into(),
        }
    }

    pub fn empty_payload(secret_name: impl Into<String>) -> Self {
        Self::EmptyPayload {
            secret_name: secret_name.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            reason: reason.into(),
        }
    }

    pub fn unexpected(context: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Unexpected {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Stable label used for metrics and structured logs
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingIdentifier { .. } => "missing_identifier",
            Self::StoreUnavailable { .. } => "store_unavailable",
            Self::SecretNotFound { .. } => "secret_not_found",
            Self::EmptyPayload { .. } => "empty_payload",
            Self::MalformedPayload { .. } => "malformed_payload",
            Self::IncompleteSecret { .. } => "incomplete_secret",
            Self::Decode { .. } => "decode_error",
            Self::InvalidMapping { .. } => "invalid_mapping",
            Self::AlreadyPublished => "already_published",
            Self::Unexpected { .. } => "unexpected",
        }
    }

    /// Get remediation guidance for this error
    pub fn remediation(&self) -> String {
        match self {
            Self::MissingIdentifier { variable } => {
                format!("Set {variable} to the name or ARN of the secret holding the service credentials.")
            }
            Self::StoreUnavailable { .. } => {
                "Check network access to the secret store, the IAM role or credentials available to the process, and the configured region/endpoint.".to_string()
            }
            Self::SecretNotFound { secret_name } => {
                format!("Verify that secret '{secret_name}' exists in the configured account and region.")
            }
            Self::EmptyPayload { secret_name } => {
                format!("Store the credentials in '{secret_name}' as a JSON SecretString (binary secrets are not supported).")
            }
            Self::MalformedPayload { .. } => {
                "The secret must be a flat JSON object whose values are strings.".to_string()
            }
            Self::IncompleteSecret { missing_keys } => {
                format!("Add the following keys to the secret: {}.", missing_keys.join(", "))
            }
            Self::Decode { key, .. } => {
                format!("Re-encode '{key}' as standard base64 of its UTF-8 text (e.g. `base64 -w0 key.pem`).")
            }
            Self::InvalidMapping { .. } => {
                "Fix the secret mapping table: keys and configuration names must be unique.".to_string()
            }
            Self::AlreadyPublished => {
                "Bootstrap must run exactly once per process; remove the second initialization call.".to_string()
            }
            Self::Unexpected { .. } => {
                "Unknown bootstrap error. Check the logs for the underlying cause.".to_string()
            }
        }
    }
}
