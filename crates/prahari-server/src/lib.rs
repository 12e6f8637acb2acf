//! HTTP server for Prahari.
//!
//! Exposes grievance intake, lookup, annotation, and chain audit over a
//! JSON API backed by one in-process ledger.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{AppState, HealthResponse};
pub use server::PrahariServer;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use prahari_mirror::{InMemoryRegistry, RemoteMirror};
    use prahari_sdk::Prahari;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use super::*;

    fn app() -> Router {
        router::build_router(AppState::new(Prahari::local()))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        send(
            app,
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    fn zero_hash() -> String {
        "00".repeat(32)
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (status, body) = get(&app(), "/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn intake_then_lookup_locally() {
        let app = app();
        let (status, body) = post(
            &app,
            "/v1/grievances",
            json!({ "grievance_id": "123456", "content_hash": format!("0x{}", zero_hash()) }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["record"]["grievance_id"], "123456");
        assert_eq!(body["record"]["status"], "Pending");
        assert_eq!(body["block"]["index"], 2);
        assert_eq!(body["mirror"]["status"], "local_only");

        let (status, body) = get(&app, "/v1/grievances/123456").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["found"], true);
        assert_eq!(body["source"], "local");
        assert_eq!(body["block_index"], 2);
    }

    #[tokio::test]
    async fn intake_generates_id() {
        let (status, body) = post(
            &app(),
            "/v1/grievances",
            json!({ "content_hash": zero_hash(), "status": "Escalated" }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["record"]["grievance_id"].as_str().unwrap().len(), 6);
        assert_eq!(body["record"]["status"], "Escalated");
    }

    #[tokio::test]
    async fn short_hash_is_rejected() {
        let app = app();
        let (status, body) = post(
            &app,
            "/v1/grievances",
            json!({ "grievance_id": "1", "content_hash": "0102" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("32 bytes"));

        let (_, blocks) = get(&app, "/v1/chain/blocks").await;
        assert_eq!(blocks.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_bodies_are_rejected() {
        let app = app();
        let (status, _) = post(&app, "/v1/grievances", json!({ "content_hash": "xyz" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = post(&app, "/v1/grievances", json!({ "status": "Pending" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn unknown_grievance_is_not_found_body() {
        let (status, body) = get(&app(), "/v1/grievances/999999").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "found": false }));
    }

    #[tokio::test]
    async fn verify_reports_clean_chain() {
        let app = app();
        post(&app, "/v1/grievances", json!({ "content_hash": zero_hash() })).await;
        let (status, body) = get(&app, "/v1/chain/verify").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_valid"], true);
        assert_eq!(body["total_blocks"], 2);
        assert_eq!(body["chain_integrity"], "VERIFIED");
        assert_eq!(body["tampering_detected"], false);
        assert_eq!(body["remote_network"], "Not Connected");
        assert_eq!(body["registry_address"], "Not Deployed");
        assert_eq!(body["blocks"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn annotations_update_history() {
        let app = app();
        post(
            &app,
            "/v1/grievances",
            json!({ "grievance_id": "555555", "content_hash": zero_hash() }),
        )
        .await;

        let (status, body) = post(
            &app,
            "/v1/grievances/555555/annotations",
            json!({ "field": "status", "value": "Resolved" }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["record"]["kind"]["type"], "annotation");

        let (status, _) = post(
            &app,
            "/v1/grievances/555555/annotations",
            json!({ "field": "mood", "value": "calm" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, history) = get(&app, "/v1/grievances/555555/history").await;
        assert_eq!(history["status"], "Resolved");
        assert_eq!(history["annotations"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn mirrored_lookup_prefers_remote() {
        let registry = Arc::new(InMemoryRegistry::new());
        let prahari = Prahari::local().with_mirror(RemoteMirror::new(registry));
        let app = router::build_router(AppState::new(prahari));

        let (_, body) = post(
            &app,
            "/v1/grievances",
            json!({ "grievance_id": "777777", "content_hash": zero_hash() }),
        )
        .await;
        assert_eq!(body["mirror"]["status"], "registered");

        let (_, body) = get(&app, "/v1/grievances/777777").await;
        assert_eq!(body["source"], "remote");
        assert_eq!(body["content_hash"], zero_hash());
    }
}
