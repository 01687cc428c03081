//! # Bootstrap Configuration
//!
//! Process-level settings loaded from environment variables.
//!
//! All configuration has sensible defaults and can be overridden via environment variables.
//! For local runs a `.env` file is loaded first (see `runtime::initialization`).

mod bootstrap;
mod server;

pub use bootstrap::{BootstrapConfig, StoreBackend};
pub use server::ServerConfig;

/// Read a variable through `lookup` or return the default value
fn env_var_or_default<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// `true`, `1`, `yes` and `on` (any case) enable a flag
fn flag_enabled(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}
