use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use prahari_mirror::MirrorConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

pub const ENV_BIND: &str = "PRAHARI_BIND";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub mirror: MirrorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 5000)),
            mirror: MirrorConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))
    }

    /// Overlay `PRAHARI_BIND` and the mirror's `PRAHARI_REGISTRY_*` variables.
    pub fn apply_env(&mut self) -> ServerResult<()> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    pub fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> ServerResult<()> {
        if let Some(bind) = var(ENV_BIND).filter(|v| !v.trim().is_empty()) {
            self.bind_addr = bind
                .parse()
                .map_err(|e| ServerError::Config(format!("{ENV_BIND}={bind}: {e}")))?;
        }
        self.mirror.apply_vars(var);
        Ok(())
    }
}
