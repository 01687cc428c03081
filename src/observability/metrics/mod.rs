//! # Metrics Module
//!
//! Prometheus metrics for monitoring the bootstrap.
//!
//! ## Sub-modules
//!
//! - `registry` - Metrics registry setup, registration and export
//! - `bootstrap_metrics` - Bootstrap attempts, failures, fetch latency, published entries

pub mod bootstrap_metrics;
pub mod registry;

pub use bootstrap_metrics::*;
pub use registry::*;
