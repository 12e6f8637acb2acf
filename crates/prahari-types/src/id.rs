use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

const MAX_ID_LEN: usize = 64;

/// Opaque grievance ticket identifier.
///
/// The ledger treats ids as opaque and never enforces uniqueness; intake
/// normally issues six-digit numeric tickets via [`GrievanceId::generate`].
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrievanceId(String);

impl GrievanceId {
    /// Issue a random six-digit ticket (`100000..=999999`).
    pub fn generate() -> Self {
        let n: u32 = rand::thread_rng().gen_range(100_000..=999_999);
        Self(n.to_string())
    }

    /// Validate an id received from outside the process.
    ///
    /// Ids must be non-empty, at most 64 characters, and consist of ASCII
    /// letters, digits, `-` and `_` only, so they can travel as a single URL
    /// path segment or query value.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if s.is_empty() {
            return Err(TypeError::InvalidGrievanceId("empty".into()));
        }
        if s.len() > MAX_ID_LEN {
            return Err(TypeError::InvalidGrievanceId(format!(
                "longer than {MAX_ID_LEN} characters"
            )));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(TypeError::InvalidGrievanceId(format!(
                "{s:?} may only contain ASCII letters, digits, '-' and '_'"
            )));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for GrievanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GrievanceId({})", self.0)
    }
}

impl fmt::Display for GrievanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GrievanceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for GrievanceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for GrievanceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
