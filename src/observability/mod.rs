//! # Observability
//!
//! Prometheus metrics. Logging goes through `tracing`, configured in
//! `runtime::initialization`.

pub mod metrics;
