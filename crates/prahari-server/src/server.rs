use prahari_sdk::Prahari;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// Prahari HTTP server.
pub struct PrahariServer {
    config: ServerConfig,
    prahari: Prahari,
}

impl PrahariServer {
    /// Fresh in-memory ledger, mirrored when the config names a registry.
    pub fn new(config: ServerConfig) -> Self {
        let prahari = Prahari::from_config(&config.mirror);
        Self::with_prahari(config, prahari)
    }

    pub fn with_prahari(config: ServerConfig, prahari: Prahari) -> Self {
        Self { config, prahari }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(AppState::new(self.prahari.clone()))
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            mirrored = self.prahari.mirror().is_some(),
            "Prahari server listening"
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
