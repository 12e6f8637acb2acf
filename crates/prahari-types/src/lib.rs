//! Foundation types for the Prahari grievance ledger.
//!
//! Every other Prahari crate depends on `prahari-types`.
//!
//! # Key Types
//!
//! - [`GrievanceId`]: Opaque ticket identifier handed to the caller at intake
//! - [`ContentHash`]: Exactly-32-byte digest of a grievance's content artifact
//! - [`BlockHash`]: Digest of a sealed ledger block
//! - [`Timestamp`]: UTC wall-clock instant with the ledger's display format

pub mod digest;
pub mod error;
pub mod id;
pub mod time;

pub use digest::{BlockHash, ContentHash};
pub use error::TypeError;
pub use id::GrievanceId;
pub use time::Timestamp;
