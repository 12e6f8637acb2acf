use prahari_ledger::VerificationReport;
use serde::{Deserialize, Serialize};

pub const NOT_CONNECTED: &str = "Not Connected";
pub const NOT_DEPLOYED: &str = "Not Deployed";

/// Ledger verification report plus the state of the remote registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    #[serde(flatten)]
    pub report: VerificationReport,
    pub remote_network: String,
    pub remote_latest_block: u64,
    pub registry_address: String,
}

impl AuditReport {
    /// Report for a ledger with no reachable registry.
    pub fn local(report: VerificationReport) -> Self {
        Self {
            report,
            remote_network: NOT_CONNECTED.into(),
            remote_latest_block: 0,
            registry_address: NOT_DEPLOYED.into(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.remote_network != NOT_CONNECTED
    }
}
