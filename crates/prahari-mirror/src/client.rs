use async_trait::async_trait;
use prahari_types::{ContentHash, GrievanceId};
use serde::{Deserialize, Serialize};

use crate::error::RegistryResult;

/// Network the registry is deployed on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkStatus {
    pub network: String,
    pub latest_block: u64,
}

/// Receipt of a successful remote write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub tx_hash: String,
    pub block_number: u64,
}

/// Grievance as stored by the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub grievance_id: GrievanceId,
    pub content_hash: ContentHash,
    /// Seconds since the UNIX epoch.
    pub timestamp: u64,
    pub registered_by: String,
}

/// Surface of an external grievance registry service.
///
/// Every call may fail; callers that must not fail go through
/// [`RemoteMirror`](crate::RemoteMirror).
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Address of the deployed registry, if one is configured.
    fn registry_address(&self) -> Option<String>;

    /// Whether a writing identity is configured at all.
    fn can_write(&self) -> bool;

    /// Reachability probe; also reports the remote head.
    async fn status(&self) -> RegistryResult<NetworkStatus>;

    /// Credit held by the writing identity.
    async fn balance(&self) -> RegistryResult<u64>;

    async fn register_grievance(
        &self,
        grievance_id: &GrievanceId,
        content_hash: &ContentHash,
    ) -> RegistryResult<Registration>;

    async fn grievance_exists(&self, grievance_id: &GrievanceId) -> RegistryResult<bool>;

    async fn get_grievance(&self, grievance_id: &GrievanceId) -> RegistryResult<RegistryEntry>;

    /// Search registration events for the transaction that wrote the id.
    async fn find_registration_tx(
        &self,
        grievance_id: &GrievanceId,
    ) -> RegistryResult<Option<String>>;
}
