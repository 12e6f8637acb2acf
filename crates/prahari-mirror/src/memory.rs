use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use prahari_types::{ContentHash, GrievanceId, Timestamp};

use crate::client::{NetworkStatus, Registration, RegistryClient, RegistryEntry};
use crate::error::{RegistryError, RegistryResult};

const DEFAULT_IDENTITY: &str = "0x00000000000000000000000000000000000000a1";
const DEFAULT_ADDRESS: &str = "0x0000000000000000000000000000000000000c0d";

/// In-process registry for tests, local demos, and embedding.
///
/// Behaves like a paid-write remote service: each registration costs credit,
/// duplicate ids are rejected, and the service can be switched offline.
pub struct InMemoryRegistry {
    network: String,
    address: String,
    inner: Mutex<RegistryState>,
}

struct RegistryState {
    reachable: bool,
    identity: Option<String>,
    balance: u64,
    write_cost: u64,
    latency: Option<Duration>,
    block_number: u64,
    entries: BTreeMap<GrievanceId, (RegistryEntry, Registration)>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self {
            network: "In-Memory Registry".into(),
            address: DEFAULT_ADDRESS.into(),
            inner: Mutex::new(RegistryState {
                reachable: true,
                identity: Some(DEFAULT_IDENTITY.into()),
                balance: 1_000,
                write_cost: 1,
                latency: None,
                block_number: 0,
                entries: BTreeMap::new(),
            }),
        }
    }

    pub fn with_balance(self, balance: u64) -> Self {
        self.state().balance = balance;
        self
    }

    pub fn with_identity(self, identity: Option<&str>) -> Self {
        self.state().identity = identity.map(str::to_string);
        self
    }

    /// Delay every call, to exercise caller timeouts.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.state().latency = Some(latency);
        self
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.state().reachable = reachable;
    }

    pub fn balance_now(&self) -> u64 {
        self.state().balance
    }

    pub fn entry_count(&self) -> usize {
        self.state().entries.len()
    }

    /// A poisoned lock only means a panicking test thread; the state is
    /// plain data and stays usable.
    fn state(&self) -> MutexGuard<'_, RegistryState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn enter(&self) -> RegistryResult<MutexGuard<'_, RegistryState>> {
        let latency = self.state().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        let state = self.state();
        if !state.reachable {
            return Err(RegistryError::Unreachable("registry offline".into()));
        }
        Ok(state)
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn tx_hash_for(grievance_id: &GrievanceId, block_number: u64) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(grievance_id.as_str().as_bytes());
    hasher.update(&block_number.to_be_bytes());
    format!("0x{}", hex::encode(hasher.finalize().as_bytes()))
}

#[async_trait]
impl RegistryClient for InMemoryRegistry {
    fn registry_address(&self) -> Option<String> {
        Some(self.address.clone())
    }

    fn can_write(&self) -> bool {
        self.state().identity.is_some()
    }

    async fn status(&self) -> RegistryResult<NetworkStatus> {
        let state = self.enter().await?;
        Ok(NetworkStatus {
            network: self.network.clone(),
            latest_block: state.block_number,
        })
    }

    async fn balance(&self) -> RegistryResult<u64> {
        Ok(self.enter().await?.balance)
    }

    async fn register_grievance(
        &self,
        grievance_id: &GrievanceId,
        content_hash: &ContentHash,
    ) -> RegistryResult<Registration> {
        let mut state = self.enter().await?;
        let identity = state
            .identity
            .clone()
            .ok_or_else(|| RegistryError::NotConfigured("no writing identity".into()))?;
        if state.balance < state.write_cost {
            return Err(RegistryError::InsufficientFunds {
                balance: state.balance,
                required: state.write_cost,
            });
        }
        if state.entries.contains_key(grievance_id) {
            return Err(RegistryError::Rejected("Grievance ID already exists".into()));
        }

        state.balance -= state.write_cost;
        state.block_number += 1;
        let registration = Registration {
            tx_hash: tx_hash_for(grievance_id, state.block_number),
            block_number: state.block_number,
        };
        let entry = RegistryEntry {
            grievance_id: grievance_id.clone(),
            content_hash: *content_hash,
            timestamp: Timestamp::now().as_datetime().timestamp().max(0) as u64,
            registered_by: identity,
        };
        state
            .entries
            .insert(grievance_id.clone(), (entry, registration.clone()));
        Ok(registration)
    }

    async fn grievance_exists(&self, grievance_id: &GrievanceId) -> RegistryResult<bool> {
        Ok(self.enter().await?.entries.contains_key(grievance_id))
    }

    async fn get_grievance(&self, grievance_id: &GrievanceId) -> RegistryResult<RegistryEntry> {
        self.enter()
            .await?
            .entries
            .get(grievance_id)
            .map(|(entry, _)| entry.clone())
            .ok_or_else(|| RegistryError::Rejected(format!("grievance {grievance_id} not found")))
    }

    async fn find_registration_tx(
        &self,
        grievance_id: &GrievanceId,
    ) -> RegistryResult<Option<String>> {
        Ok(self
            .enter()
            .await?
            .entries
            .get(grievance_id)
            .map(|(_, reg)| reg.tx_hash.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> GrievanceId {
        GrievanceId::from(s)
    }

    #[tokio::test]
    async fn register_then_get() {
        let registry = InMemoryRegistry::new();
        let reg = registry
            .register_grievance(&id("100000"), &ContentHash::zero())
            .await
            .unwrap();
        assert_eq!(reg.block_number, 1);
        assert!(reg.tx_hash.starts_with("0x"));

        assert!(registry.grievance_exists(&id("100000")).await.unwrap());
        let entry = registry.get_grievance(&id("100000")).await.unwrap();
        assert_eq!(entry.registered_by, DEFAULT_IDENTITY);
        assert_eq!(
            registry.find_registration_tx(&id("100000")).await.unwrap(),
            Some(reg.tx_hash)
        );
        assert_eq!(registry.balance_now(), 999);
    }

    #[tokio::test]
    async fn duplicate_is_rejected() {
        let registry = InMemoryRegistry::new();
        registry
            .register_grievance(&id("100000"), &ContentHash::zero())
            .await
            .unwrap();
        let err = registry
            .register_grievance(&id("100000"), &ContentHash::zero())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Rejected(_)));
        assert_eq!(registry.entry_count(), 1);
    }

    #[tokio::test]
    async fn empty_balance_is_rejected() {
        let registry = InMemoryRegistry::new().with_balance(0);
        let err = registry
            .register_grievance(&id("100000"), &ContentHash::zero())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::InsufficientFunds {
                balance: 0,
                required: 1
            }
        );
    }

    #[tokio::test]
    async fn offline_registry_is_unreachable() {
        let registry = InMemoryRegistry::new();
        registry.set_reachable(false);
        assert!(matches!(
            registry.status().await,
            Err(RegistryError::Unreachable(_))
        ));
        assert!(matches!(
            registry.grievance_exists(&id("1")).await,
            Err(RegistryError::Unreachable(_))
        ));
    }

    #[tokio::test]
    async fn missing_identity_cannot_write() {
        let registry = InMemoryRegistry::new().with_identity(None);
        assert!(!registry.can_write());
        assert!(matches!(
            registry
                .register_grievance(&id("1"), &ContentHash::zero())
                .await,
            Err(RegistryError::NotConfigured(_))
        ));
    }
}
