use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the axum router with all Prahari endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/chain/verify", get(handler::verify_handler))
        .route("/v1/chain/blocks", get(handler::blocks_handler))
        .route("/v1/grievances", post(handler::intake_handler))
        .route("/v1/grievances/:id", get(handler::lookup_handler))
        .route("/v1/grievances/:id/history", get(handler::history_handler))
        .route(
            "/v1/grievances/:id/annotations",
            post(handler::annotate_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
