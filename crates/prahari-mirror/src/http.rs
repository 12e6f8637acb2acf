//! JSON-over-HTTP registry client.
//!
//! Talks to a registry gateway that fronts the deployed grievance contract.
//! Uses `ureq` (sync) wrapped in `tokio::task::spawn_blocking` so that remote
//! calls never block the async runtime.

use std::time::Duration;

use async_trait::async_trait;
use prahari_types::{ContentHash, GrievanceId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use crate::client::{NetworkStatus, Registration, RegistryClient, RegistryEntry};
use crate::error::{RegistryError, RegistryResult};

/// Registry gateway reached over HTTP.
///
/// - `GET  {base}/v1/status`
/// - `GET  {base}/v1/account` (bearer token)
/// - `POST {base}/v1/registries/{address}/grievances` (bearer token)
/// - `GET  {base}/v1/registries/{address}/grievances/{id}/exists`
/// - `GET  {base}/v1/registries/{address}/grievances/{id}`
/// - `GET  {base}/v1/registries/{address}/events?grievance_id={id}`
pub struct HttpRegistry {
    base_url: String,
    address: String,
    api_token: Option<String>,
    agent: ureq::Agent,
}

#[derive(Deserialize)]
struct AccountResponse {
    balance: u64,
}

#[derive(Deserialize)]
struct ExistsResponse {
    exists: bool,
}

#[derive(Deserialize)]
struct EventsResponse {
    events: Vec<RegistrationEvent>,
}

#[derive(Deserialize, Serialize)]
struct RegistrationEvent {
    tx_hash: String,
}

impl HttpRegistry {
    pub fn new(
        base_url: impl Into<String>,
        address: impl Into<String>,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            address: address.into(),
            api_token,
            agent: ureq::Agent::new_with_config(config),
        }
    }

    /// `base_url` plus `segments`, each percent-encoded as one path segment.
    fn endpoint(&self, segments: &[&str]) -> RegistryResult<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            RegistryError::NotConfigured(format!("invalid registry URL {}: {e}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                RegistryError::NotConfigured(format!(
                    "registry URL {} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn registry_url(&self, tail: &[&str]) -> RegistryResult<Url> {
        let mut segments = vec!["v1", "registries", self.address.as_str()];
        segments.extend_from_slice(tail);
        self.endpoint(&segments)
    }

    /// Ids that would not survive as a single path segment are refused
    /// before any request is made.
    fn checked_id(grievance_id: &GrievanceId) -> RegistryResult<&str> {
        GrievanceId::parse(grievance_id.as_str())
            .map(|_| grievance_id.as_str())
            .map_err(|e| RegistryError::Rejected(e.to_string()))
    }

    fn grievance_url(&self, grievance_id: &GrievanceId, tail: &[&str]) -> RegistryResult<Url> {
        let mut segments = vec!["grievances", Self::checked_id(grievance_id)?];
        segments.extend_from_slice(tail);
        self.registry_url(&segments)
    }

    fn events_url(&self, grievance_id: &GrievanceId) -> RegistryResult<Url> {
        let id = Self::checked_id(grievance_id)?;
        let mut url = self.registry_url(&["events"])?;
        url.query_pairs_mut().append_pair("grievance_id", id);
        Ok(url)
    }

    fn bearer(&self) -> Option<String> {
        self.api_token.as_ref().map(|t| format!("Bearer {t}"))
    }

    async fn get_json<T>(&self, url: Url, auth: Option<String>) -> RegistryResult<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || {
            let mut request = agent.get(url.as_str());
            if let Some(auth) = &auth {
                request = request.header("Authorization", auth);
            }
            let response = request.call().map_err(map_ureq_error)?;
            response
                .into_body()
                .read_json::<T>()
                .map_err(|e| RegistryError::Decode(e.to_string()))
        })
        .await
        .map_err(|e| RegistryError::Unreachable(format!("task join error: {e}")))?
    }

    async fn post_json<T>(
        &self,
        url: Url,
        auth: Option<String>,
        body: serde_json::Value,
    ) -> RegistryResult<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || {
            let mut request = agent.post(url.as_str());
            if let Some(auth) = &auth {
                request = request.header("Authorization", auth);
            }
            let response = request.send_json(body).map_err(map_ureq_error)?;
            response
                .into_body()
                .read_json::<T>()
                .map_err(|e| RegistryError::Decode(e.to_string()))
        })
        .await
        .map_err(|e| RegistryError::Unreachable(format!("task join error: {e}")))?
    }
}

/// Conflict means the registry already holds the id; everything else on
/// the wire is a transport problem.
fn map_ureq_error(err: ureq::Error) -> RegistryError {
    match err {
        ureq::Error::StatusCode(409) => {
            RegistryError::Rejected("Grievance ID already exists".into())
        }
        ureq::Error::StatusCode(402) => RegistryError::InsufficientFunds {
            balance: 0,
            required: 1,
        },
        ureq::Error::StatusCode(status) => RegistryError::Status {
            status,
            message: "unexpected response".into(),
        },
        ureq::Error::Timeout(_) => RegistryError::Unreachable("request timed out".into()),
        other => RegistryError::Unreachable(other.to_string()),
    }
}

#[async_trait]
impl RegistryClient for HttpRegistry {
    fn registry_address(&self) -> Option<String> {
        Some(self.address.clone())
    }

    fn can_write(&self) -> bool {
        self.api_token.is_some()
    }

    async fn status(&self) -> RegistryResult<NetworkStatus> {
        self.get_json(self.endpoint(&["v1", "status"])?, None)
            .await
    }

    async fn balance(&self) -> RegistryResult<u64> {
        let auth = self
            .bearer()
            .ok_or_else(|| RegistryError::NotConfigured("registry API token not set".into()))?;
        let account: AccountResponse = self
            .get_json(self.endpoint(&["v1", "account"])?, Some(auth))
            .await?;
        Ok(account.balance)
    }

    async fn register_grievance(
        &self,
        grievance_id: &GrievanceId,
        content_hash: &ContentHash,
    ) -> RegistryResult<Registration> {
        let auth = self
            .bearer()
            .ok_or_else(|| RegistryError::NotConfigured("registry API token not set".into()))?;
        let body = json!({
            "grievance_id": grievance_id,
            "content_hash": format!("0x{}", content_hash.to_hex()),
        });
        Self::checked_id(grievance_id)?;
        let url = self.registry_url(&["grievances"])?;
        self.post_json(url, Some(auth), body)
            .await
    }

    async fn grievance_exists(&self, grievance_id: &GrievanceId) -> RegistryResult<bool> {
        let resp: ExistsResponse = self
            .get_json(self.grievance_url(grievance_id, &["exists"])?, None)
            .await?;
        Ok(resp.exists)
    }

    async fn get_grievance(&self, grievance_id: &GrievanceId) -> RegistryResult<RegistryEntry> {
        self.get_json(self.grievance_url(grievance_id, &[])?, None)
            .await
    }

    async fn find_registration_tx(
        &self,
        grievance_id: &GrievanceId,
    ) -> RegistryResult<Option<String>> {
        let resp: EventsResponse = self
            .get_json(self.events_url(grievance_id)?, None)
            .await?;
        Ok(resp.events.into_iter().next().map(|e| e.tx_hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(token: Option<&str>) -> HttpRegistry {
        HttpRegistry::new(
            "http://127.0.0.1:1/",
            "0xc0d",
            token.map(str::to_string),
            Duration::from_millis(200),
        )
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let r = registry(None);
        assert_eq!(
            r.registry_url(&["grievances"]).unwrap().as_str(),
            "http://127.0.0.1:1/v1/registries/0xc0d/grievances"
        );
    }

    #[test]
    fn grievance_urls_keep_id_in_one_segment() {
        let r = registry(None);
        let id = GrievanceId::from("100000");
        let exists = r.grievance_url(&id, &["exists"]).unwrap();
        assert_eq!(exists.path(), "/v1/registries/0xc0d/grievances/100000/exists");

        let events = r.events_url(&id).unwrap();
        assert_eq!(events.path(), "/v1/registries/0xc0d/events");
        assert_eq!(events.query(), Some("grievance_id=100000"));
    }

    #[test]
    fn segments_are_percent_encoded() {
        let url = registry(None).endpoint(&["v1", "a#b/c"]).unwrap();
        assert_eq!(url.path(), "/v1/a%23b%2Fc");
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn ids_with_url_delimiters_are_refused() {
        let r = registry(None);
        for raw in ["100000#x", "100000/../200000", "..", "1?x=2"] {
            let id = GrievanceId::from(raw);
            assert!(matches!(
                r.grievance_url(&id, &["exists"]),
                Err(RegistryError::Rejected(_))
            ));
        }
        let injected = GrievanceId::from("1&grievance_id=999999");
        assert!(matches!(
            r.events_url(&injected),
            Err(RegistryError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn lookup_with_fragment_id_never_reaches_network() {
        // The port is closed, so a request attempt would come back Unreachable.
        let r = registry(None);
        let id = GrievanceId::from("100000#x");
        assert!(matches!(
            r.grievance_exists(&id).await,
            Err(RegistryError::Rejected(_))
        ));
        assert!(matches!(
            r.get_grievance(&id).await,
            Err(RegistryError::Rejected(_))
        ));
    }

    #[test]
    fn malformed_base_url_is_not_configured() {
        let r = HttpRegistry::new("not a url", "0xc0d", None, Duration::from_millis(10));
        assert!(matches!(
            r.endpoint(&["v1", "status"]),
            Err(RegistryError::NotConfigured(_))
        ));
    }

    #[test]
    fn write_needs_token() {
        assert!(!registry(None).can_write());
        assert!(registry(Some("secret")).can_write());
        assert_eq!(
            registry(Some("secret")).bearer().as_deref(),
            Some("Bearer secret")
        );
    }

    #[test]
    fn conflict_maps_to_rejection() {
        assert!(matches!(
            map_ureq_error(ureq::Error::StatusCode(409)),
            RegistryError::Rejected(_)
        ));
        assert!(matches!(
            map_ureq_error(ureq::Error::StatusCode(500)),
            RegistryError::Status { status: 500, .. }
        ));
    }

    #[tokio::test]
    async fn balance_without_token_is_not_configured() {
        assert!(matches!(
            registry(None).balance().await,
            Err(RegistryError::NotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn closed_port_is_unreachable() {
        let result = registry(None).status().await;
        assert!(matches!(result, Err(RegistryError::Unreachable(_))));
    }
}
