//! Optional remote registry mirror for the Prahari ledger.
//!
//! The local ledger is the system of record. This crate lets it also
//! write registrations through to an external grievance registry and read
//! them back, without ever letting a remote failure reach the caller.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod mirror;

pub use client::{NetworkStatus, Registration, RegistryClient, RegistryEntry};
pub use config::MirrorConfig;
pub use error::{RegistryError, RegistryResult};
pub use http::HttpRegistry;
pub use memory::InMemoryRegistry;
pub use mirror::{MirrorOutcome, RemoteAnswer, RemoteMirror, DEFAULT_TIMEOUT};
