//! Tamper-evident grievance ledger for Prahari.
//!
//! This crate is the heart of Prahari. It provides:
//! - `Record` / `Block` types with canonical, hash-linked encoding
//! - `Ledger`: the append-only chain plus its pending-record buffer
//! - `SharedLedger`: one-lock handle for concurrent callers
//! - `LedgerWriter` / `LedgerReader` trait boundaries
//! - Fail-fast chain verification and per-block verification reports
//! - Record lookup and annotation projections

pub mod block;
pub mod chain;
pub mod error;
pub mod lookup;
pub mod projection;
pub mod record;
pub mod report;
pub mod shared;
pub mod traits;

pub use block::{Block, BlockPayload, GENESIS_MARKER, GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
pub use chain::Ledger;
pub use error::LedgerError;
pub use lookup::{LocalHit, LookupHit, LookupResult, RemoteHit};
pub use projection::{AnnotationEntry, GrievanceHistory, ProjectionBuilder};
pub use record::{AnnotationField, Record, RecordKind, ANNOTATED_STATUS, DEFAULT_STATUS};
pub use report::{
    BlockSummary, ChainIntegrity, ChainVerification, TamperKind, TamperingDetail,
    VerificationReport,
};
pub use shared::SharedLedger;
pub use traits::{LedgerReader, LedgerWriter};
