use prahari_crypto::HashChainVerifier;
use prahari_types::{BlockHash, ContentHash, GrievanceId, Timestamp, TypeError};
use tracing::{debug, info};

use crate::block::{Block, BlockPayload};
use crate::error::LedgerError;
use crate::lookup::{LocalHit, LookupResult};
use crate::record::{AnnotationField, Record};
use crate::report::{
    BlockSummary, ChainIntegrity, ChainVerification, TamperKind, TamperingDetail,
    VerificationReport,
};

const BROKEN_LINK_MESSAGE: &str = "Hash chain broken - data may have been altered";

/// Append-only, hash-linked block sequence with a pending-record buffer.
///
/// `Ledger` does no locking of its own: every mutation goes through
/// `&mut self`. Share it across tasks through
/// [`SharedLedger`](crate::SharedLedger).
#[derive(Clone, Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Record>,
}

impl Ledger {
    /// Create a ledger holding only the genesis block.
    pub fn new() -> Self {
        Self {
            chain: vec![Block::genesis()],
            pending: Vec::new(),
        }
    }

    /// Buffer an intake record.
    ///
    /// `content_hash` must be exactly 32 bytes; other lengths are rejected,
    /// never padded. Duplicate ids are accepted.
    pub fn buffer_record(
        &mut self,
        grievance_id: impl Into<GrievanceId>,
        content_hash: &[u8],
        status: impl Into<String>,
    ) -> Result<Record, LedgerError> {
        let content_hash = ContentHash::from_slice(content_hash).map_err(|e| match e {
            TypeError::InvalidLength { actual, .. } => LedgerError::InvalidContentHash { actual },
            other => LedgerError::InvalidValue(other),
        })?;
        let record = Record::intake(grievance_id.into(), content_hash, status);
        debug!(grievance_id = %record.grievance_id, "buffered record");
        self.pending.push(record.clone());
        Ok(record)
    }

    /// Buffer an annotation amending a grievance without touching sealed
    /// blocks.
    pub fn buffer_annotation(
        &mut self,
        grievance_id: impl Into<GrievanceId>,
        field: AnnotationField,
        value: impl Into<String>,
    ) -> Record {
        let record = Record::annotation(grievance_id.into(), field, value.into());
        debug!(grievance_id = %record.grievance_id, %field, "buffered annotation");
        self.pending.push(record.clone());
        record
    }

    /// Seal every pending record into a new block linked to the last one.
    pub fn seal_block(&mut self, proof: u64) -> Result<Block, LedgerError> {
        let previous = self.last_block()?;
        let previous_hash = previous.hash().to_hex();
        let index = self.chain.len() as u64 + 1;
        let records = std::mem::take(&mut self.pending);
        let block = Block {
            index,
            sealed_at: Timestamp::now(),
            payload: BlockPayload::Records(records),
            proof,
            previous_hash,
        };
        info!(
            index,
            proof,
            records = block.records().len(),
            "sealed block"
        );
        self.chain.push(block.clone());
        Ok(block)
    }

    /// Buffer one intake record and seal it, with anything already
    /// pending, as the next block.
    pub fn buffer_and_seal(
        &mut self,
        grievance_id: impl Into<GrievanceId>,
        content_hash: &[u8],
        status: impl Into<String>,
        proof: u64,
    ) -> Result<(Record, Block), LedgerError> {
        let record = self.buffer_record(grievance_id, content_hash, status)?;
        let block = self.seal_block(proof)?;
        Ok((record, block))
    }

    /// Proof for the next block: records sealed so far, plus one.
    pub fn next_proof(&self) -> u64 {
        self.sealed_record_count() as u64 + 1
    }

    /// Canonical hash of a block.
    pub fn hash(block: &Block) -> BlockHash {
        block.hash()
    }

    pub fn last_block(&self) -> Result<&Block, LedgerError> {
        self.chain.last().ok_or(LedgerError::EmptyChain)
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Record] {
        &self.pending
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Always `false` after construction.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Total records across all sealed blocks.
    pub fn sealed_record_count(&self) -> usize {
        self.chain.iter().map(|b| b.records().len()).sum()
    }

    /// Walk the chain and stop at the first broken hash link.
    pub fn verify_chain(&self) -> ChainVerification {
        if self.chain.len() <= 1 {
            return ChainVerification {
                is_valid: true,
                message: "Blockchain is valid".into(),
                tampering_details: Vec::new(),
            };
        }

        match HashChainVerifier::first_break(&self.chain) {
            None => ChainVerification {
                is_valid: true,
                message: "Blockchain is valid and immutable".into(),
                tampering_details: Vec::new(),
            },
            Some(brk) => {
                let position = brk.position as u64;
                ChainVerification {
                    is_valid: false,
                    message: format!("TAMPERING DETECTED at Block {position}"),
                    tampering_details: vec![TamperingDetail {
                        block_index: position,
                        error_type: TamperKind::HashMismatch,
                        expected_hash: brk.expected,
                        actual_hash: brk.actual,
                        message: format!("Block {position} references incorrect previous hash"),
                    }],
                }
            }
        }
    }

    /// Full verification report with a per-block breakdown.
    pub fn verification_report(&self) -> VerificationReport {
        let verification = self.verify_chain();
        let tampering_detected = !verification.tampering_details.is_empty();

        let mut blocks = Vec::with_capacity(self.chain.len());
        let mut previous: Option<&Block> = None;
        for block in &self.chain {
            let broken = previous
                .and_then(|prev| HashChainVerifier::check_link(prev, block))
                .is_some();
            blocks.push(BlockSummary {
                index: block.index,
                hash: block.hash().to_hex(),
                previous_hash: block.previous_hash.clone(),
                timestamp: block.sealed_at.display(),
                data_count: block.payload.data_count(),
                grievance_ids: block.grievance_ids(),
                is_valid: !broken,
                error_message: broken.then(|| BROKEN_LINK_MESSAGE.to_string()),
            });
            previous = Some(block);
        }

        let hash_at = |block: Option<&Block>| block.map(|b| b.hash().to_hex()).unwrap_or_default();

        VerificationReport {
            is_valid: verification.is_valid,
            message: verification.message,
            total_blocks: self.chain.len(),
            genesis_hash: hash_at(self.chain.first()),
            latest_hash: hash_at(self.chain.last()),
            chain_integrity: if verification.is_valid {
                ChainIntegrity::Verified
            } else {
                ChainIntegrity::Compromised
            },
            tampering_detected,
            tampering_details: verification.tampering_details,
            blocks,
        }
    }

    /// Locate the intake record for `grievance_id` in the sealed chain.
    ///
    /// Linear in the number of sealed records; no index is kept.
    pub fn find_record(&self, grievance_id: &GrievanceId) -> LookupResult {
        self.chain
            .iter()
            .find_map(|block| {
                block
                    .records()
                    .iter()
                    .find(|r| r.is_intake() && &r.grievance_id == grievance_id)
                    .map(|r| LocalHit {
                        grievance_id: r.grievance_id.clone(),
                        block_index: block.index,
                        block_hash: block.hash().to_hex(),
                        timestamp: r.created_at.display(),
                        status: r.status.clone(),
                    })
            })
            .map(LookupResult::local)
            .unwrap_or_else(LookupResult::not_found)
    }

    #[cfg(test)]
    pub(crate) fn chain_mut(&mut self) -> &mut Vec<Block> {
        &mut self.chain
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
