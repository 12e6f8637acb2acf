use prahari_types::{BlockHash, ContentHash};
use serde_json::Value;

/// Domain-separated BLAKE3 hasher.
///
/// Each hasher carries a domain tag that is prepended to every hash
/// computation, so a block and an annotation with identical bytes never
/// share a digest.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for sealed ledger blocks.
    pub const BLOCK: Self = Self {
        domain: "prahari-block-v1",
    };
    /// Hasher for annotation values appended after intake.
    pub const ANNOTATION: Self = Self {
        domain: "prahari-annotation-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        *hasher.finalize().as_bytes()
    }

    /// Hash a JSON value in canonical form.
    ///
    /// `serde_json::Map` keeps keys sorted, so two structurally equal values
    /// always render to the same bytes.
    pub fn hash_canonical(&self, value: &Value) -> BlockHash {
        BlockHash::from_hash(self.hash(value.to_string().as_bytes()))
    }

    /// Hash a value into a content digest.
    pub fn content(&self, data: &[u8]) -> ContentHash {
        ContentHash::from(self.hash(data))
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}
