use prahari_ledger::{Block, Record, DEFAULT_STATUS};
use prahari_mirror::MirrorOutcome;
use prahari_types::{ContentHash, GrievanceId};
use serde::{Deserialize, Serialize};

/// A grievance to be recorded.
#[derive(Clone, Debug)]
pub struct IntakeRequest {
    pub grievance_id: Option<GrievanceId>,
    pub content_hash: Vec<u8>,
    pub status: Option<String>,
}

impl IntakeRequest {
    pub fn new(content_hash: impl Into<Vec<u8>>) -> Self {
        Self {
            grievance_id: None,
            content_hash: content_hash.into(),
            status: None,
        }
    }

    /// Digest `content` rather than passing a precomputed hash.
    pub fn for_content(content: &[u8]) -> Self {
        Self::new(ContentHash::of(content).as_bytes().to_vec())
    }

    pub fn with_id(mut self, grievance_id: impl Into<GrievanceId>) -> Self {
        self.grievance_id = Some(grievance_id.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn effective_status(&self) -> &str {
        self.status.as_deref().unwrap_or(DEFAULT_STATUS)
    }
}

/// Result of [`Prahari::register`](crate::Prahari::register): buffered
/// locally, mirrored if possible.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Registered {
    pub record: Record,
    pub mirror: MirrorOutcome,
}

/// Result of a sealed intake.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntakeReceipt {
    pub record: Record,
    pub block: Block,
    pub mirror: MirrorOutcome,
}

impl IntakeReceipt {
    pub fn grievance_id(&self) -> &GrievanceId {
        &self.record.grievance_id
    }
}

/// Result of a sealed annotation. Annotations are never mirrored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationReceipt {
    pub record: Record,
    pub block: Block,
}
