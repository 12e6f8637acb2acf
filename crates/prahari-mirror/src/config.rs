use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http::HttpRegistry;
use crate::mirror::RemoteMirror;

pub const ENV_REGISTRY_URL: &str = "PRAHARI_REGISTRY_URL";
pub const ENV_REGISTRY_ADDRESS: &str = "PRAHARI_REGISTRY_ADDRESS";
pub const ENV_REGISTRY_TOKEN: &str = "PRAHARI_REGISTRY_TOKEN";
pub const ENV_REMOTE_TIMEOUT_MS: &str = "PRAHARI_REMOTE_TIMEOUT_MS";

/// Where the remote registry lives and how long to wait for it.
///
/// Absent endpoint or address means no mirror: intake stays local-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    pub endpoint: Option<String>,
    pub registry_address: Option<String>,
    /// Bearer credential of the writing identity.
    pub api_token: Option<String>,
    pub timeout_ms: u64,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            registry_address: None,
            api_token: None,
            timeout_ms: 10_000,
        }
    }
}

impl MirrorConfig {
    /// Overlay the `PRAHARI_REGISTRY_*` process environment.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary variable source. Empty values are
    /// ignored, as is an unparsable timeout.
    pub fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = var(ENV_REGISTRY_URL) {
            self.endpoint = Some(url);
        }
        if let Some(address) = var(ENV_REGISTRY_ADDRESS) {
            self.registry_address = Some(address);
        }
        if let Some(token) = var(ENV_REGISTRY_TOKEN) {
            self.api_token = Some(token);
        }
        if let Some(ms) = var(ENV_REMOTE_TIMEOUT_MS) {
            match ms.parse() {
                Ok(ms) => self.timeout_ms = ms,
                Err(_) => debug!(value = %ms, "ignoring unparsable {ENV_REMOTE_TIMEOUT_MS}"),
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some() && self.registry_address.is_some()
    }

    /// Build the HTTP-backed mirror, or `None` when unconfigured.
    pub fn connect(&self) -> Option<RemoteMirror> {
        let (endpoint, address) = match (&self.endpoint, &self.registry_address) {
            (Some(endpoint), Some(address)) => (endpoint, address),
            _ => return None,
        };
        let registry = HttpRegistry::new(
            endpoint.clone(),
            address.clone(),
            self.api_token.clone(),
            self.timeout(),
        );
        Some(RemoteMirror::with_timeout(Arc::new(registry), self.timeout()))
    }
}
