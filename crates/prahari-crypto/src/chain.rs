use prahari_types::BlockHash;

/// Trait for items that participate in a hash chain.
pub trait HashLinked {
    /// The stored reference to the predecessor's hash, as recorded at seal
    /// time.
    fn previous_link(&self) -> &str;
    /// Recompute this item's own hash from its current content.
    fn recompute_hash(&self) -> BlockHash;
}

/// First broken link found in a chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkBreak {
    /// Zero-based position of the item whose stored link is wrong.
    pub position: usize,
    /// Hash recomputed from the predecessor.
    pub expected: String,
    /// Link actually stored in the item.
    pub actual: String,
}

/// Hash chain integrity verifier.
///
/// Each item's stored link must equal the recomputed hash of the item just
/// before it. The first item is the chain root and is not checked.
pub struct HashChainVerifier;

impl HashChainVerifier {
    /// Walk the chain forward and stop at the first broken link.
    pub fn first_break<T: HashLinked>(chain: &[T]) -> Option<LinkBreak> {
        chain
            .windows(2)
            .enumerate()
            .find_map(|(i, pair)| Self::check_link(&pair[0], &pair[1]).map(|(expected, actual)| {
                LinkBreak {
                    position: i + 1,
                    expected,
                    actual,
                }
            }))
    }

    /// Check a single predecessor/successor pair.
    ///
    /// Returns `Some((expected, actual))` when the link does not hold.
    pub fn check_link<T: HashLinked>(previous: &T, next: &T) -> Option<(String, String)> {
        let expected = previous.recompute_hash().to_hex();
        let actual = next.previous_link();
        if expected == actual {
            None
        } else {
            Some((expected, actual.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::ContentHasher;

    struct TestItem {
        link: String,
        payload: Vec<u8>,
    }

    impl HashLinked for TestItem {
        fn previous_link(&self) -> &str {
            &self.link
        }
        fn recompute_hash(&self) -> BlockHash {
            let mut data = self.link.clone().into_bytes();
            data.extend_from_slice(&self.payload);
            BlockHash::from_hash(ContentHasher::BLOCK.hash(&data))
        }
    }

    fn build_chain(count: usize) -> Vec<TestItem> {
        let mut chain: Vec<TestItem> = Vec::new();
        for i in 0..count {
            let link = chain
                .last()
                .map(|prev| prev.recompute_hash().to_hex())
                .unwrap_or_else(|| "0".into());
            chain.push(TestItem {
                link,
                payload: format!("item-{i}").into_bytes(),
            });
        }
        chain
    }

    #[test]
    fn empty_chain_is_valid() {
        let chain: Vec<TestItem> = vec![];
        assert_eq!(HashChainVerifier::first_break(&chain), None);
    }

    #[test]
    fn single_item_chain_is_valid() {
        assert_eq!(HashChainVerifier::first_break(&build_chain(1)), None);
    }

    #[test]
    fn multi_item_chain_is_valid() {
        assert_eq!(HashChainVerifier::first_break(&build_chain(10)), None);
    }

    #[test]
    fn tampered_payload_breaks_following_link() {
        let mut chain = build_chain(4);
        chain[1].payload = b"tampered".to_vec();
        let brk = HashChainVerifier::first_break(&chain).unwrap();
        assert_eq!(brk.position, 2);
        assert_eq!(brk.actual, chain[2].link);
        assert_eq!(brk.expected, chain[1].recompute_hash().to_hex());
    }

    #[test]
    fn only_first_break_is_reported() {
        let mut chain = build_chain(5);
        chain[1].payload = b"first".to_vec();
        chain[3].payload = b"second".to_vec();
        let brk = HashChainVerifier::first_break(&chain).unwrap();
        assert_eq!(brk.position, 2);
    }

    #[test]
    fn rewriting_root_breaks_first_link() {
        let mut chain = build_chain(3);
        chain[0].link = "not-zero".into();
        let brk = HashChainVerifier::first_break(&chain).unwrap();
        assert_eq!(brk.position, 1);
    }
}
