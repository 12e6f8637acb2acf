use std::time::Duration;

use thiserror::Error;

/// Failures reported by a remote registry.
///
/// None of these ever reach intake callers: [`RemoteMirror`](crate::RemoteMirror)
/// downgrades them to local-only outcomes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("registry unreachable: {0}")]
    Unreachable(String),

    #[error("registry not configured: {0}")]
    NotConfigured(String),

    #[error("insufficient balance: have {balance}, need {required}")]
    InsufficientFunds { balance: u64, required: u64 },

    #[error("registry rejected request: {0}")]
    Rejected(String),

    #[error("registry returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed registry response: {0}")]
    Decode(String),

    #[error("registry call timed out after {0:?}")]
    Timeout(Duration),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
