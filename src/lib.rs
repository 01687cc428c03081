//! Secret Bootstrap Library
//!
//! Fail-fast startup bootstrap: fetch the service's secret bundle from the
//! secret store, check that every required field is present, decode encoded
//! fields and publish the result as immutable configuration.
//!
//! Tests are included in the module files and under `tests/`.

pub mod config;
pub mod constants;
pub mod error;
pub mod observability;
pub mod provider;
pub mod runtime;
pub mod secrets;
pub mod server;

pub use error::{BootstrapError, DecodeFailure};
pub use secrets::{ConfigRegistry, PublishedConfig, SecretMapping};
