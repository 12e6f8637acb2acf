use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use prahari_types::GrievanceId;

use crate::block::Block;
use crate::chain::Ledger;
use crate::error::LedgerError;
use crate::lookup::LookupResult;
use crate::projection::{GrievanceHistory, ProjectionBuilder};
use crate::record::{AnnotationField, Record};
use crate::report::{ChainVerification, VerificationReport};
use crate::traits::{LedgerReader, LedgerWriter};

/// Process-wide ledger handle.
///
/// Chain and pending buffer sit behind a single lock: writers are
/// exclusive, readers may run concurrently with each other but never observe
/// a half-sealed block. Hand it out as `Arc<SharedLedger>`.
pub struct SharedLedger {
    inner: RwLock<Ledger>,
}

impl SharedLedger {
    pub fn new() -> Self {
        Self::from_ledger(Ledger::new())
    }

    pub fn from_ledger(ledger: Ledger) -> Self {
        Self {
            inner: RwLock::new(ledger),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Ledger>, LedgerError> {
        self.inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned("read"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Ledger>, LedgerError> {
        self.inner
            .write()
            .map_err(|_| LedgerError::LockPoisoned("write"))
    }

    /// Run `f` with exclusive access, e.g. to buffer several records and
    /// seal them as one block.
    pub fn with_write<T>(
        &self,
        f: impl FnOnce(&mut Ledger) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let mut ledger = self.write()?;
        f(&mut ledger)
    }

    /// Run `f` with shared read access.
    pub fn with_read<T>(&self, f: impl FnOnce(&Ledger) -> T) -> Result<T, LedgerError> {
        let ledger = self.read()?;
        Ok(f(&ledger))
    }
}

impl Default for SharedLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerWriter for SharedLedger {
    fn buffer_record(
        &self,
        grievance_id: &GrievanceId,
        content_hash: &[u8],
        status: &str,
    ) -> Result<Record, LedgerError> {
        self.write()?
            .buffer_record(grievance_id.clone(), content_hash, status)
    }

    fn buffer_annotation(
        &self,
        grievance_id: &GrievanceId,
        field: AnnotationField,
        value: &str,
    ) -> Result<Record, LedgerError> {
        Ok(self
            .write()?
            .buffer_annotation(grievance_id.clone(), field, value))
    }

    fn seal_block(&self, proof: u64) -> Result<Block, LedgerError> {
        self.write()?.seal_block(proof)
    }

    fn buffer_and_seal(
        &self,
        grievance_id: &GrievanceId,
        content_hash: &[u8],
        status: &str,
        proof: u64,
    ) -> Result<(Record, Block), LedgerError> {
        self.write()?
            .buffer_and_seal(grievance_id.clone(), content_hash, status, proof)
    }
}

impl LedgerReader for SharedLedger {
    fn last_block(&self) -> Result<Block, LedgerError> {
        self.read()?.last_block().cloned()
    }

    fn blocks(&self) -> Result<Vec<Block>, LedgerError> {
        Ok(self.read()?.chain().to_vec())
    }

    fn pending(&self) -> Result<Vec<Record>, LedgerError> {
        Ok(self.read()?.pending().to_vec())
    }

    fn block_count(&self) -> Result<usize, LedgerError> {
        Ok(self.read()?.len())
    }

    fn verify_chain(&self) -> Result<ChainVerification, LedgerError> {
        Ok(self.read()?.verify_chain())
    }

    fn verification_report(&self) -> Result<VerificationReport, LedgerError> {
        Ok(self.read()?.verification_report())
    }

    fn find_record(&self, grievance_id: &GrievanceId) -> Result<LookupResult, LedgerError> {
        Ok(self.read()?.find_record(grievance_id))
    }

    fn history(&self, grievance_id: &GrievanceId) -> Result<GrievanceHistory, LedgerError> {
        Ok(ProjectionBuilder::history(&*self.read()?, grievance_id))
    }
}
