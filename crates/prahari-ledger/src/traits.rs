use prahari_types::GrievanceId;

use crate::block::Block;
use crate::error::LedgerError;
use crate::lookup::LookupResult;
use crate::projection::GrievanceHistory;
use crate::record::{AnnotationField, Record};
use crate::report::{ChainVerification, VerificationReport};

/// Write boundary for ledger append operations.
pub trait LedgerWriter: Send + Sync {
    fn buffer_record(
        &self,
        grievance_id: &GrievanceId,
        content_hash: &[u8],
        status: &str,
    ) -> Result<Record, LedgerError>;

    fn buffer_annotation(
        &self,
        grievance_id: &GrievanceId,
        field: AnnotationField,
        value: &str,
    ) -> Result<Record, LedgerError>;

    fn seal_block(&self, proof: u64) -> Result<Block, LedgerError>;

    /// Buffer and seal in one critical section.
    fn buffer_and_seal(
        &self,
        grievance_id: &GrievanceId,
        content_hash: &[u8],
        status: &str,
        proof: u64,
    ) -> Result<(Record, Block), LedgerError>;
}

/// Read boundary for verification and lookup.
pub trait LedgerReader: Send + Sync {
    fn last_block(&self) -> Result<Block, LedgerError>;

    fn blocks(&self) -> Result<Vec<Block>, LedgerError>;

    fn pending(&self) -> Result<Vec<Record>, LedgerError>;

    fn block_count(&self) -> Result<usize, LedgerError>;

    fn verify_chain(&self) -> Result<ChainVerification, LedgerError>;

    fn verification_report(&self) -> Result<VerificationReport, LedgerError>;

    fn find_record(&self, grievance_id: &GrievanceId) -> Result<LookupResult, LedgerError>;

    fn history(&self, grievance_id: &GrievanceId) -> Result<GrievanceHistory, LedgerError>;
}
