use std::sync::Arc;

use prahari_ledger::{
    AnnotationField, Block, GrievanceHistory, LedgerReader, LedgerWriter, LookupResult,
    Record, SharedLedger, VerificationReport,
};
use prahari_mirror::{MirrorConfig, MirrorOutcome, RemoteAnswer, RemoteMirror};
use prahari_types::GrievanceId;
use tracing::{debug, info};

use crate::audit::{AuditReport, NOT_DEPLOYED};
use crate::error::SdkResult;
use crate::intake::{AnnotationReceipt, IntakeReceipt, IntakeRequest, Registered};

/// High-level Prahari API.
///
/// The local ledger is authoritative for acceptance. The optional mirror is
/// written after every local commit and consulted first on lookup; its
/// failures are logged and otherwise invisible.
#[derive(Clone)]
pub struct Prahari {
    ledger: Arc<SharedLedger>,
    mirror: Option<RemoteMirror>,
}

impl Prahari {
    pub fn new(ledger: Arc<SharedLedger>) -> Self {
        Self {
            ledger,
            mirror: None,
        }
    }

    /// Fresh ledger, no mirror.
    pub fn local() -> Self {
        Self::new(Arc::new(SharedLedger::new()))
    }

    /// Fresh ledger, mirrored if `config` names a registry.
    pub fn from_config(config: &MirrorConfig) -> Self {
        let prahari = Self::local();
        match config.connect() {
            Some(mirror) => prahari.with_mirror(mirror),
            None => {
                info!("no remote registry configured; running local-only");
                prahari
            }
        }
    }

    pub fn with_mirror(mut self, mirror: RemoteMirror) -> Self {
        self.mirror = Some(mirror);
        self
    }

    pub fn ledger(&self) -> &Arc<SharedLedger> {
        &self.ledger
    }

    pub fn mirror(&self) -> Option<&RemoteMirror> {
        self.mirror.as_ref()
    }

    // ---- Writes ----

    /// Buffer a grievance locally, then try to mirror it.
    ///
    /// Construction errors (bad hash length) propagate; the remote outcome
    /// never does.
    pub async fn register(
        &self,
        grievance_id: &GrievanceId,
        content_hash: &[u8],
        status: &str,
    ) -> SdkResult<Registered> {
        let record = self
            .ledger
            .buffer_record(grievance_id, content_hash, status)?;
        let mirror = self.mirror_record(&record).await;
        Ok(Registered { record, mirror })
    }

    /// Buffer and seal a grievance as one block, then try to mirror it.
    pub async fn intake(&self, request: IntakeRequest) -> SdkResult<IntakeReceipt> {
        let grievance_id = request
            .grievance_id
            .clone()
            .unwrap_or_else(GrievanceId::generate);
        let status = request.effective_status();

        let (record, block) = self.ledger.with_write(|ledger| {
            let proof = ledger.next_proof();
            ledger.buffer_and_seal(grievance_id, &request.content_hash, status, proof)
        })?;

        let mirror = self.mirror_record(&record).await;
        Ok(IntakeReceipt {
            record,
            block,
            mirror,
        })
    }

    async fn mirror_record(&self, record: &Record) -> MirrorOutcome {
        match &self.mirror {
            Some(mirror) => {
                mirror
                    .register(&record.grievance_id, &record.content_hash)
                    .await
            }
            None => MirrorOutcome::unconfigured(),
        }
    }

    /// Record post-commit metadata for a grievance in a new block.
    pub fn annotate(
        &self,
        grievance_id: &GrievanceId,
        field: AnnotationField,
        value: &str,
    ) -> SdkResult<AnnotationReceipt> {
        let (record, block) = self.ledger.with_write(|ledger| {
            let proof = ledger.next_proof();
            let record = ledger.buffer_annotation(grievance_id.clone(), field, value);
            let block = ledger.seal_block(proof)?;
            Ok((record, block))
        })?;
        Ok(AnnotationReceipt { record, block })
    }

    /// Seal whatever is pending, possibly nothing.
    pub fn seal(&self) -> SdkResult<Block> {
        let block = self.ledger.with_write(|ledger| {
            let proof = ledger.next_proof();
            ledger.seal_block(proof)
        })?;
        Ok(block)
    }

    // ---- Reads ----

    /// Remote-first resolution: a remote hit wins, anything else falls back
    /// to the sealed local chain.
    pub async fn lookup(&self, grievance_id: &GrievanceId) -> SdkResult<LookupResult> {
        if let Some(mirror) = &self.mirror {
            match mirror.lookup(grievance_id).await {
                RemoteAnswer::Found(hit) => return Ok(LookupResult::remote(hit)),
                RemoteAnswer::Absent => {
                    debug!(%grievance_id, "not on remote registry; checking local chain")
                }
                RemoteAnswer::Unavailable(reason) => {
                    debug!(%grievance_id, %reason, "remote lookup unavailable; checking local chain")
                }
            }
        }
        Ok(self.ledger.find_record(grievance_id)?)
    }

    pub fn history(&self, grievance_id: &GrievanceId) -> SdkResult<GrievanceHistory> {
        Ok(self.ledger.history(grievance_id)?)
    }

    pub fn blocks(&self) -> SdkResult<Vec<Block>> {
        Ok(self.ledger.blocks()?)
    }

    pub fn verification_report(&self) -> SdkResult<VerificationReport> {
        Ok(self.ledger.verification_report()?)
    }

    /// Verification report enriched with the registry's network state.
    pub async fn audit_report(&self) -> SdkResult<AuditReport> {
        let mut audit = AuditReport::local(self.verification_report()?);
        if let Some(mirror) = &self.mirror {
            audit.registry_address = mirror
                .registry_address()
                .unwrap_or_else(|| NOT_DEPLOYED.into());
            if let Some(status) = mirror.status().await {
                audit.remote_network = status.network;
                audit.remote_latest_block = status.latest_block;
            }
        }
        Ok(audit)
    }
}
