use prahari_types::{ContentHash, GrievanceId};
use serde::{Deserialize, Serialize};

/// Outcome of a single-record lookup.
///
/// Serializes as `{"found": false}` on a miss, or as `{"found": true,
/// "source": "local" | "remote", ...}` with the source's own fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    pub found: bool,
    #[serde(flatten)]
    pub hit: Option<LookupHit>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum LookupHit {
    Local(LocalHit),
    Remote(RemoteHit),
}

/// Location of a record inside the local chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalHit {
    pub grievance_id: GrievanceId,
    pub block_index: u64,
    pub block_hash: String,
    /// Buffering time of the record.
    pub timestamp: String,
    pub status: String,
}

/// Registration reported by the remote registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteHit {
    pub grievance_id: GrievanceId,
    pub content_hash: ContentHash,
    pub timestamp: String,
    pub registered_by: String,
    /// Registration transaction, when the event search could find it.
    pub tx_hash: Option<String>,
}

impl LookupResult {
    pub fn not_found() -> Self {
        Self {
            found: false,
            hit: None,
        }
    }

    pub fn local(hit: LocalHit) -> Self {
        Self {
            found: true,
            hit: Some(LookupHit::Local(hit)),
        }
    }

    pub fn remote(hit: RemoteHit) -> Self {
        Self {
            found: true,
            hit: Some(LookupHit::Remote(hit)),
        }
    }

    /// `"local"` or `"remote"`; `None` on a miss.
    pub fn source(&self) -> Option<&'static str> {
        match &self.hit {
            Some(LookupHit::Local(_)) => Some("local"),
            Some(LookupHit::Remote(_)) => Some("remote"),
            None => None,
        }
    }

    pub fn as_local(&self) -> Option<&LocalHit> {
        match &self.hit {
            Some(LookupHit::Local(hit)) => Some(hit),
            _ => None,
        }
    }

    pub fn as_remote(&self) -> Option<&RemoteHit> {
        match &self.hit {
            Some(LookupHit::Remote(hit)) => Some(hit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_serializes_without_source() {
        let json = serde_json::to_value(LookupResult::not_found()).unwrap();
        assert_eq!(json, serde_json::json!({ "found": false }));
    }

    #[test]
    fn local_hit_is_tagged() {
        let result = LookupResult::local(LocalHit {
            grievance_id: GrievanceId::from("100000"),
            block_index: 2,
            block_hash: "ab".repeat(32),
            timestamp: "2024-01-01 00:00:00".into(),
            status: "Pending".into(),
        });
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["found"], true);
        assert_eq!(json["source"], "local");
        assert_eq!(json["block_index"], 2);
        assert_eq!(result.source(), Some("local"));
    }

    #[test]
    fn remote_hit_parses_back() {
        let result = LookupResult::remote(RemoteHit {
            grievance_id: GrievanceId::from("100000"),
            content_hash: ContentHash::zero(),
            timestamp: "2024-01-01 00:00:00".into(),
            registered_by: "0xabc".into(),
            tx_hash: None,
        });
        let json = serde_json::to_string(&result).unwrap();
        let parsed: LookupResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.source(), Some("remote"));
        assert_eq!(parsed.as_remote().unwrap().registered_by, "0xabc");
    }

    #[test]
    fn miss_parses_back() {
        let parsed: LookupResult = serde_json::from_str(r#"{"found":false}"#).unwrap();
        assert!(!parsed.found);
        assert!(parsed.hit.is_none());
    }
}
