use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("ledger error: {0}")]
    Ledger(#[from] prahari_ledger::LedgerError),
}

pub type SdkResult<T> = Result<T, SdkError>;
