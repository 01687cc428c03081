//! # Secrets Pipeline
//!
//! Parse → validate → decode → publish.
//!
//! ## Module Structure
//!
//! - `mapping.rs` - Required secret keys and their published names
//! - `bundle.rs` - Raw payload and parsed bundle
//! - `validation.rs` - Completeness gate
//! - `decode.rs` - Per-field transport decoding
//! - `publish.rs` - Published configuration and write-once registry

pub mod bundle;
pub mod decode;
pub mod mapping;
pub mod publish;
pub mod validation;

// Re-export public API
pub use bundle::{RawPayload, SecretBundle};
pub use decode::decode_field;
pub use mapping::{FieldEncoding, MappingEntry, SecretMapping};
pub use publish::{
    decode_all, export_to_env, install_decoded, publish, ConfigRegistry, PublishedConfig,
};
pub use validation::{missing_keys, validate};
