//! Signers and the quorum for the oracle.
//!
//! A signer exposes its address and the capability to sign a message digest
//! under the Ethereum personal-message scheme. The quorum owns the full
//! signer set, enforces the ascending-address order the destination-domain
//! contract verifies against, and signs atomically.

mod local;
mod quorum;

pub use local::LocalSigner;
pub use quorum::{QuorumSignature, SignerQuorum};

use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountError {
	#[error("Signing failed: {0}")]
	SigningFailed(String),

	#[error("Invalid key: {0}")]
	InvalidKey(String),

	#[error("Duplicate signer address: {0}")]
	DuplicateSigner(Address),
}

/// A signing capability bound to one address.
#[async_trait]
pub trait SignerInterface: Send + Sync {
	/// The signer's 20-byte address.
	fn address(&self) -> Address;

	/// Signs the EIP-191 personal-message digest of `digest`, returning the
	/// 65-byte (r, s, v) signature with v as 27 or 28.
	async fn sign_digest(&self, digest: B256) -> Result<[u8; 65], AccountError>;
}
