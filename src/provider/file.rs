//! # File Secret Store
//!
//! Reads secret payloads from `<root>/<name>.json`. Meant for local development
//! and tests where no cloud secret store is reachable.

use crate::error::BootstrapError;
use crate::observability::metrics;
use crate::provider::SecretStore;
use crate::secrets::RawPayload;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

/// Directory of JSON secret files
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    root: PathBuf,
}

impl FileSecretStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `name` to a file inside the root; names that could escape it resolve to nothing
    fn secret_path(&self, name: &str) -> Option<PathBuf> {
        let escapes = name.is_empty()
            || name.contains(['/', '\\'])
            || name == "."
            || name.contains("..");
        if escapes {
            None
        } else {
            Some(self.root.join(format!("{name}.json")))
        }
    }
}

#[async_trait]
impl SecretStore for FileSecretStore {
    fn backend(&self) -> &'static str {
        "file"
    }

    async fn fetch_secret(&self, name: &str) -> Result<RawPayload, BootstrapError> {
        let path = self
            .secret_path(name)
            .ok_or_else(|| BootstrapError::secret_not_found(name))?;
        let start = Instant::now();

        let result = tokio::fs::read_to_string(&path).await;
        metrics::observe_fetch_duration("file", start.elapsed().as_secs_f64());

        match result {
            Ok(contents) => {
                debug!(path = %path.display(), "read secret file");
                let payload = RawPayload::new(contents);
                if payload.is_blank() {
                    Err(BootstrapError::empty_payload(name))
                } else {
                    Ok(payload)
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(BootstrapError::secret_not_found(name)),
            // read_to_string reports non-UTF-8 content as InvalidData
            Err(e) if e.kind() == ErrorKind::InvalidData => Err(BootstrapError::malformed(
                format!("secret file {} is not valid UTF-8", path.display()),
            )),
            Err(e) => Err(BootstrapError::store_unavailable(
                name,
                format!("failed to read {}: {e}", path.display()),
            )),
        }
    }
}
