//! High-level SDK for Prahari.
//!
//! [`Prahari`] combines the local ledger with the optional remote mirror:
//! local-first intake, remote-first lookup, and audit reports. This is the
//! entry point for the server and for applications embedding the ledger.

pub mod audit;
pub mod error;
pub mod intake;
pub mod prahari;

pub use audit::AuditReport;
pub use error::{SdkError, SdkResult};
pub use intake::{AnnotationReceipt, IntakeReceipt, IntakeRequest, Registered};
pub use prahari::Prahari;

// Re-export key types
pub use prahari_ledger::{
    AnnotationField, Block, GrievanceHistory, LookupResult, Record, VerificationReport,
};
pub use prahari_mirror::{MirrorConfig, MirrorOutcome, RemoteMirror};
pub use prahari_types::{ContentHash, GrievanceId};
