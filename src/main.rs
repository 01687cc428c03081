//! # Secret Bootstrap
//!
//! Composition root for a service whose credentials live in AWS Secrets Manager.
//!
//! ## Overview
//!
//! 1. **Bootstrap** - Fetches the secret named by `SECRETS_NAME`, checks that every required
//!    field is present, base64-decodes the private key and publishes the configuration
//! 2. **Barrier** - Nothing listens until the bootstrap has completed successfully
//! 3. **Serve** - Starts the probe server (`/healthz`, `/readyz`, `/metrics`) with the
//!    published configuration in its state
//!
//! Any bootstrap failure exits non-zero before a listener is bound.
//!
//! The bootstrap runs on its own single-threaded runtime. That runtime is dropped, joining
//! its blocking pool, before the optional environment export, so `set_var` (there and in `.env` loading) runs while the
//! main thread is the only thread in the process.

use anyhow::{Context, Result};
use secret_bootstrap::runtime::initialization::{export_published_env, init_process, initialize};
use secret_bootstrap::server::{start_server, ServerState};
use std::sync::Arc;

fn main() -> Result<()> {
    init_process();

    let bootstrap_runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build bootstrap runtime")?;
    let init_result = bootstrap_runtime.block_on(initialize())?;
    drop(bootstrap_runtime);

    export_published_env(&init_result);

    let server_runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build server runtime")?;

    let server_state = Arc::new(ServerState::new(init_result.published));
    server_runtime.block_on(start_server(init_result.server_config.probe_port, server_state))
}
