use std::fmt;

use prahari_types::GrievanceId;
use serde::{Deserialize, Serialize};

/// Kind of integrity violation found while walking the chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TamperKind {
    HashMismatch,
}

impl fmt::Display for TamperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HashMismatch => f.write_str("HASH_MISMATCH"),
        }
    }
}

/// One detected break in the hash chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TamperingDetail {
    /// Zero-based chain position of the block whose stored link is wrong.
    pub block_index: u64,
    pub error_type: TamperKind,
    pub expected_hash: String,
    pub actual_hash: String,
    pub message: String,
}

/// Result of a fail-fast walk over the chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainVerification {
    pub is_valid: bool,
    pub message: String,
    /// At most one entry: the walk stops at the first break.
    pub tampering_details: Vec<TamperingDetail>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChainIntegrity {
    Verified,
    Compromised,
}

impl fmt::Display for ChainIntegrity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verified => f.write_str("VERIFIED"),
            Self::Compromised => f.write_str("COMPROMISED"),
        }
    }
}

/// Per-block row of a verification report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub index: u64,
    pub hash: String,
    pub previous_hash: String,
    pub timestamp: String,
    pub data_count: usize,
    pub grievance_ids: Vec<GrievanceId>,
    /// Judged against the immediately preceding block only.
    pub is_valid: bool,
    pub error_message: Option<String>,
}

/// Audit-facing verification report over the whole chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub is_valid: bool,
    pub message: String,
    pub total_blocks: usize,
    pub genesis_hash: String,
    pub latest_hash: String,
    pub chain_integrity: ChainIntegrity,
    pub tampering_detected: bool,
    pub tampering_details: Vec<TamperingDetail>,
    pub blocks: Vec<BlockSummary>,
}

impl VerificationReport {
    /// Summaries of blocks that fail their own predecessor check.
    pub fn broken_blocks(&self) -> impl Iterator<Item = &BlockSummary> {
        self.blocks.iter().filter(|b| !b.is_valid)
    }
}
