//! The attestation pipeline.
//!
//! Orchestrates chain fetch, event extraction, filtering, canonical encoding,
//! quorum signing, and attestation assembly, in two independently invocable
//! modes: on-demand for a single transaction, and a serialized continuous
//! poller over the pending block.

mod pipeline;
mod poller;

pub use pipeline::AttestationPipeline;
pub use poller::Poller;
