use prahari_crypto::{ContentHasher, HashLinked};
use prahari_types::{BlockHash, GrievanceId, Timestamp};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};

use crate::record::Record;

/// Payload marker carried by the first block of every chain.
pub const GENESIS_MARKER: &str = "Genesis Block";

/// `previous_hash` sentinel of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Proof value stamped on the genesis block.
pub const GENESIS_PROOF: u64 = 1;

/// Contents of a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockPayload {
    /// Only ever appears at index 1.
    Genesis,
    /// Records buffered since the previous seal, in arrival order.
    Records(Vec<Record>),
}

impl BlockPayload {
    pub fn records(&self) -> &[Record] {
        match self {
            Self::Genesis => &[],
            Self::Records(records) => records,
        }
    }

    /// Number of data items: the marker counts as one.
    pub fn data_count(&self) -> usize {
        match self {
            Self::Genesis => 1,
            Self::Records(records) => records.len(),
        }
    }

    fn canonical(&self) -> Value {
        match self {
            Self::Genesis => Value::String(GENESIS_MARKER.into()),
            Self::Records(records) => Value::Array(records.iter().map(Record::canonical).collect()),
        }
    }
}

impl Serialize for BlockPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Genesis => serializer.serialize_str(GENESIS_MARKER),
            Self::Records(records) => records.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for BlockPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Marker(String),
            Records(Vec<Record>),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Marker(m) if m == GENESIS_MARKER => Ok(Self::Genesis),
            Raw::Marker(m) => Err(serde::de::Error::custom(format!(
                "unexpected payload marker: {m:?}"
            ))),
            Raw::Records(records) => Ok(Self::Records(records)),
        }
    }
}

/// A sealed, hash-linked unit of the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// 1-based position in the chain.
    pub index: u64,
    pub sealed_at: Timestamp,
    pub payload: BlockPayload,
    /// Caller-supplied sequence marker. Not validated.
    pub proof: u64,
    /// Hex hash of the preceding block, or `"0"` for genesis.
    pub previous_hash: String,
}

impl Block {
    pub(crate) fn genesis() -> Self {
        Self {
            index: 1,
            sealed_at: Timestamp::now(),
            payload: BlockPayload::Genesis,
            proof: GENESIS_PROOF,
            previous_hash: GENESIS_PREVIOUS_HASH.into(),
        }
    }

    pub fn is_genesis(&self) -> bool {
        matches!(self.payload, BlockPayload::Genesis)
    }

    pub fn records(&self) -> &[Record] {
        self.payload.records()
    }

    /// Ids of every record carried by this block, in payload order.
    pub fn grievance_ids(&self) -> Vec<GrievanceId> {
        self.records()
            .iter()
            .map(|r| r.grievance_id.clone())
            .collect()
    }

    /// Deterministic JSON rendering with sorted keys.
    pub fn canonical(&self) -> Value {
        json!({
            "index": self.index,
            "sealed_at": self.sealed_at.to_canonical(),
            "payload": self.payload.canonical(),
            "proof": self.proof,
            "previous_hash": self.previous_hash,
        })
    }

    /// Hash of the block's current content.
    pub fn hash(&self) -> BlockHash {
        ContentHasher::BLOCK.hash_canonical(&self.canonical())
    }
}

impl HashLinked for Block {
    fn previous_link(&self) -> &str {
        &self.previous_hash
    }

    fn recompute_hash(&self) -> BlockHash {
        self.hash()
    }
}
