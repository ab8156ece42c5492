//! Shared types for the bridge oracle.
//!
//! This crate holds the data model of the attestation pipeline: the wire
//! shapes returned by the upstream chain, the canonical message encoding,
//! the event filter, and the error taxonomy. Everything here is pure and
//! synchronous; network and signing concerns live in their own crates.

pub mod attestation;
pub mod chain;
pub mod errors;
pub mod events;
pub mod message;

pub use attestation::*;
pub use chain::*;
pub use errors::*;
pub use events::*;
pub use message::*;
