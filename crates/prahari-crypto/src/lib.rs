//! Cryptographic primitives for the Prahari ledger.
//!
//! Provides domain-separated BLAKE3 hashing over canonical JSON and a
//! fail-fast hash-link verifier for block sequences.
//!
//! Hashing delegates to the `blake3` crate; nothing here is custom cryptography.

pub mod chain;
pub mod hasher;

pub use chain::{HashChainVerifier, HashLinked, LinkBreak};
pub use hasher::ContentHasher;
