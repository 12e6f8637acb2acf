use prahari_types::TypeError;

/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("content hash must be exactly 32 bytes, got {actual}")]
    InvalidContentHash { actual: usize },

    #[error("ledger chain is empty; genesis block missing")]
    EmptyChain,

    #[error("ledger {0} lock poisoned")]
    LockPoisoned(&'static str),

    #[error("invalid value: {0}")]
    InvalidValue(#[from] TypeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_type_errors_clone() {
        let err = LedgerError::from(TypeError::InvalidGrievanceId("empty".into()));
        let copy = err.clone();
        assert_eq!(err, copy);
        assert_eq!(copy.to_string(), "invalid value: invalid grievance id: empty");
    }
}
