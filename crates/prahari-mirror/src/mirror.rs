use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use prahari_ledger::RemoteHit;
use prahari_types::{ContentHash, GrievanceId, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::client::{NetworkStatus, RegistryClient};
use crate::error::{RegistryError, RegistryResult};

/// Default bound on any single remote call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of attempting to mirror a record remotely.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MirrorOutcome {
    Registered { tx_hash: String, block_number: u64 },
    /// The record is held by the local ledger only.
    LocalOnly { reason: String },
}

impl MirrorOutcome {
    pub fn unconfigured() -> Self {
        Self::LocalOnly {
            reason: "remote mirror not configured".into(),
        }
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered { .. })
    }
}

/// What the remote registry had to say about a grievance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemoteAnswer {
    Found(RemoteHit),
    /// The registry answered and holds no such grievance.
    Absent,
    /// No remote answer: the registry could not be asked.
    Unavailable(String),
}

impl RemoteAnswer {
    pub fn into_hit(self) -> Option<RemoteHit> {
        match self {
            Self::Found(hit) => Some(hit),
            _ => None,
        }
    }
}

/// Best-effort corroboration channel over a [`RegistryClient`].
///
/// Neither operation can fail: registry errors, timeouts, and missing
/// preconditions become [`MirrorOutcome::LocalOnly`] or
/// [`RemoteAnswer::Unavailable`]. Each call is bounded by `timeout` and
/// attempted exactly once.
#[derive(Clone)]
pub struct RemoteMirror {
    client: Arc<dyn RegistryClient>,
    timeout: Duration,
}

impl RemoteMirror {
    pub fn new(client: Arc<dyn RegistryClient>) -> Self {
        Self::with_timeout(client, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(client: Arc<dyn RegistryClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn registry_address(&self) -> Option<String> {
        self.client.registry_address()
    }

    async fn bounded<T>(&self, call: impl Future<Output = RegistryResult<T>>) -> RegistryResult<T> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| RegistryError::Timeout(self.timeout))?
    }

    /// Submit a grievance to the registry.
    pub async fn register(
        &self,
        grievance_id: &GrievanceId,
        content_hash: &ContentHash,
    ) -> MirrorOutcome {
        if !self.client.can_write() {
            warn!(%grievance_id, "registry identity not configured; storing locally only");
            return MirrorOutcome::LocalOnly {
                reason: "registry write identity not configured".into(),
            };
        }

        match self.try_register(grievance_id, content_hash).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(%grievance_id, error = %e, "failed to register on remote registry; storing locally only");
                MirrorOutcome::LocalOnly {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn try_register(
        &self,
        grievance_id: &GrievanceId,
        content_hash: &ContentHash,
    ) -> RegistryResult<MirrorOutcome> {
        self.bounded(self.client.status()).await?;

        let balance = self.bounded(self.client.balance()).await?;
        if balance == 0 {
            return Ok(MirrorOutcome::LocalOnly {
                reason: "registry identity has no balance".into(),
            });
        }

        let registration = self
            .bounded(self.client.register_grievance(grievance_id, content_hash))
            .await?;
        info!(
            %grievance_id,
            tx_hash = %registration.tx_hash,
            block_number = registration.block_number,
            "grievance registered on remote registry"
        );
        Ok(MirrorOutcome::Registered {
            tx_hash: registration.tx_hash,
            block_number: registration.block_number,
        })
    }

    /// Ask the registry about a grievance.
    pub async fn lookup(&self, grievance_id: &GrievanceId) -> RemoteAnswer {
        match self.try_lookup(grievance_id).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(%grievance_id, error = %e, "remote lookup failed");
                RemoteAnswer::Unavailable(e.to_string())
            }
        }
    }

    async fn try_lookup(&self, grievance_id: &GrievanceId) -> RegistryResult<RemoteAnswer> {
        if !self
            .bounded(self.client.grievance_exists(grievance_id))
            .await?
        {
            return Ok(RemoteAnswer::Absent);
        }

        let entry = self
            .bounded(self.client.get_grievance(grievance_id))
            .await?;

        // Event search is secondary; its failure leaves the answer intact.
        let tx_hash = match self
            .bounded(self.client.find_registration_tx(grievance_id))
            .await
        {
            Ok(tx_hash) => tx_hash,
            Err(e) => {
                debug!(%grievance_id, error = %e, "registration event search failed");
                None
            }
        };

        Ok(RemoteAnswer::Found(RemoteHit {
            grievance_id: entry.grievance_id,
            content_hash: entry.content_hash,
            timestamp: Timestamp::from_unix_secs(entry.timestamp).display(),
            registered_by: entry.registered_by,
            tx_hash,
        }))
    }

    pub fn can_write(&self) -> bool {
        self.client.can_write()
    }

    /// Credit of the writing identity, or `None` if it cannot be read.
    pub async fn balance(&self) -> Option<u64> {
        match self.bounded(self.client.balance()).await {
            Ok(balance) => Some(balance),
            Err(e) => {
                debug!(error = %e, "registry balance unavailable");
                None
            }
        }
    }

    /// Network name and head, or `None` if the registry cannot be reached.
    pub async fn status(&self) -> Option<NetworkStatus> {
        match self.bounded(self.client.status()).await {
            Ok(status) => Some(status),
            Err(e) => {
                debug!(error = %e, "registry status unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::client::{Registration, RegistryEntry};
    use crate::memory::InMemoryRegistry;

    fn id(s: &str) -> GrievanceId {
        GrievanceId::from(s)
    }

    fn mirror(registry: InMemoryRegistry) -> (Arc<InMemoryRegistry>, RemoteMirror) {
        let registry = Arc::new(registry);
        let mirror = RemoteMirror::new(registry.clone());
        (registry, mirror)
    }

    #[tokio::test]
    async fn register_succeeds_when_funded() {
        let (_, mirror) = mirror(InMemoryRegistry::new());
        let outcome = mirror.register(&id("100000"), &ContentHash::zero()).await;
        assert!(matches!(
            outcome,
            MirrorOutcome::Registered { block_number: 1, .. }
        ));
    }

    #[tokio::test]
    async fn zero_balance_is_local_only() {
        let (registry, mirror) = mirror(InMemoryRegistry::new().with_balance(0));
        let outcome = mirror.register(&id("100000"), &ContentHash::zero()).await;
        assert!(matches!(outcome, MirrorOutcome::LocalOnly { .. }));
        assert_eq!(registry.entry_count(), 0);
    }

    #[tokio::test]
    async fn missing_identity_is_local_only() {
        let (_, mirror) = mirror(InMemoryRegistry::new().with_identity(None));
        let outcome = mirror.register(&id("100000"), &ContentHash::zero()).await;
        assert_eq!(
            outcome,
            MirrorOutcome::LocalOnly {
                reason: "registry write identity not configured".into()
            }
        );
    }

    #[tokio::test]
    async fn duplicate_is_local_only() {
        let (_, mirror) = mirror(InMemoryRegistry::new());
        mirror.register(&id("100000"), &ContentHash::zero()).await;
        let outcome = mirror.register(&id("100000"), &ContentHash::zero()).await;
        match outcome {
            MirrorOutcome::LocalOnly { reason } => assert!(reason.contains("already exists")),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn offline_registry_is_local_only_and_unavailable() {
        let (registry, mirror) = mirror(InMemoryRegistry::new());
        registry.set_reachable(false);
        assert!(!mirror
            .register(&id("100000"), &ContentHash::zero())
            .await
            .is_registered());
        assert!(matches!(
            mirror.lookup(&id("100000")).await,
            RemoteAnswer::Unavailable(_)
        ));
        assert!(mirror.status().await.is_none());
    }

    #[tokio::test]
    async fn slow_registry_times_out() {
        let registry = Arc::new(InMemoryRegistry::new().with_latency(Duration::from_millis(200)));
        let mirror = RemoteMirror::with_timeout(registry, Duration::from_millis(20));
        let outcome = mirror.register(&id("100000"), &ContentHash::zero()).await;
        match outcome {
            MirrorOutcome::LocalOnly { reason } => assert!(reason.contains("timed out")),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(matches!(
            mirror.lookup(&id("100000")).await,
            RemoteAnswer::Unavailable(_)
        ));
    }

    #[tokio::test]
    async fn diagnostics_reflect_registry() {
        let (registry, mirror) = mirror(InMemoryRegistry::new().with_balance(5));
        assert!(mirror.can_write());
        mirror.register(&id("100000"), &ContentHash::zero()).await;
        assert_eq!(mirror.balance().await, Some(4));
        assert_eq!(mirror.status().await.unwrap().latest_block, 1);

        registry.set_reachable(false);
        assert_eq!(mirror.balance().await, None);
    }

    #[tokio::test]
    async fn lookup_found_after_register() {
        let (_, mirror) = mirror(InMemoryRegistry::new());
        let hash = ContentHash::of(b"recording");
        mirror.register(&id("100000"), &hash).await;
        let hit = mirror.lookup(&id("100000")).await.into_hit().unwrap();
        assert_eq!(hit.content_hash, hash);
        assert!(hit.tx_hash.is_some());
    }

    #[tokio::test]
    async fn lookup_absent_is_definite_no() {
        let (_, mirror) = mirror(InMemoryRegistry::new());
        assert_eq!(mirror.lookup(&id("999999")).await, RemoteAnswer::Absent);
    }

    /// Registry whose event search always fails.
    struct NoEvents(InMemoryRegistry);

    #[async_trait]
    impl RegistryClient for NoEvents {
        fn registry_address(&self) -> Option<String> {
            self.0.registry_address()
        }
        fn can_write(&self) -> bool {
            self.0.can_write()
        }
        async fn status(&self) -> RegistryResult<NetworkStatus> {
            self.0.status().await
        }
        async fn balance(&self) -> RegistryResult<u64> {
            self.0.balance().await
        }
        async fn register_grievance(
            &self,
            grievance_id: &GrievanceId,
            content_hash: &ContentHash,
        ) -> RegistryResult<Registration> {
            self.0.register_grievance(grievance_id, content_hash).await
        }
        async fn grievance_exists(&self, grievance_id: &GrievanceId) -> RegistryResult<bool> {
            self.0.grievance_exists(grievance_id).await
        }
        async fn get_grievance(
            &self,
            grievance_id: &GrievanceId,
        ) -> RegistryResult<RegistryEntry> {
            self.0.get_grievance(grievance_id).await
        }
        async fn find_registration_tx(
            &self,
            _grievance_id: &GrievanceId,
        ) -> RegistryResult<Option<String>> {
            Err(RegistryError::Status {
                status: 503,
                message: "event index offline".into(),
            })
        }
    }

    #[tokio::test]
    async fn failed_event_search_keeps_answer() {
        let mirror = RemoteMirror::new(Arc::new(NoEvents(InMemoryRegistry::new())));
        mirror.register(&id("100000"), &ContentHash::zero()).await;
        let hit = mirror.lookup(&id("100000")).await.into_hit().unwrap();
        assert_eq!(hit.tx_hash, None);
    }
}
