//! Deterministically ordered multi-signer quorum.

use crate::{AccountError, SignerInterface};
use alloy_primitives::Address;
use oracle_types::EncodedMessage;
use std::sync::Arc;

/// One signer's signature over an encoded message's hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuorumSignature {
	pub signer: Address,
	pub bytes: [u8; 65],
}

impl QuorumSignature {
	/// Signature as hex, without a `0x` prefix.
	pub fn signature_hex(&self) -> String {
		hex::encode(self.bytes)
	}

	/// Signer address as hex, without a `0x` prefix.
	pub fn signer_hex(&self) -> String {
		hex::encode(self.signer.as_slice())
	}
}

/// The configured signer set, held in ascending-address order.
///
/// The destination-domain contract verifies signatures in ascending order of
/// the numeric value of each signer's address, so the order is fixed here
/// once and never depends on configuration order. Duplicate addresses are
/// rejected up front; an empty set is legal and signs to an empty list.
pub struct SignerQuorum {
	signers: Vec<Arc<dyn SignerInterface>>,
}

impl SignerQuorum {
	pub fn new(mut signers: Vec<Arc<dyn SignerInterface>>) -> Result<Self, AccountError> {
		signers.sort_by_key(|s| s.address());

		for pair in signers.windows(2) {
			if pair[0].address() == pair[1].address() {
				return Err(AccountError::DuplicateSigner(pair[1].address()));
			}
		}

		Ok(Self { signers })
	}

	pub fn len(&self) -> usize {
		self.signers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.signers.is_empty()
	}

	/// Signer addresses in signing order.
	pub fn addresses(&self) -> Vec<Address> {
		self.signers.iter().map(|s| s.address()).collect()
	}

	/// Produces one signature per signer over the message hash, in ascending
	/// signer-address order. Fails atomically: if any signer's capability
	/// fails, no signatures are returned.
	pub async fn sign(&self, message: &EncodedMessage) -> Result<Vec<QuorumSignature>, AccountError> {
		let digest = message.hash;

		futures::future::try_join_all(self.signers.iter().map(|signer| async move {
			let bytes = signer.sign_digest(digest).await?;
			Ok(QuorumSignature {
				signer: signer.address(),
				bytes,
			})
		}))
		.await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::LocalSigner;
	use alloy_primitives::B256;
	use async_trait::async_trait;
	use oracle_types::{encode, MessageKind};

	fn message() -> EncodedMessage {
		let fields: Vec<String> = vec!["0x1", "0x2", "0x3", "0x4", "500", "6", "7"]
			.into_iter()
			.map(String::from)
			.collect();
		encode(&fields, MessageKind::Direct).unwrap()
	}

	fn local(key_byte: u8) -> Arc<dyn SignerInterface> {
		let mut key = [0u8; 32];
		key[31] = key_byte;
		Arc::new(LocalSigner::from_private_key(&hex::encode(key)).unwrap())
	}

	struct FailingSigner;

	#[async_trait]
	impl SignerInterface for FailingSigner {
		fn address(&self) -> Address {
			Address::repeat_byte(0x42)
		}

		async fn sign_digest(&self, _digest: B256) -> Result<[u8; 65], AccountError> {
			Err(AccountError::SigningFailed("capability unavailable".to_string()))
		}
	}

	#[tokio::test]
	async fn test_sign_order_is_ascending_for_any_input_order() {
		let permutations: Vec<Vec<u8>> = vec![
			vec![1, 2, 3],
			vec![3, 2, 1],
			vec![2, 3, 1],
		];

		let mut outputs = Vec::new();
		for perm in permutations {
			let quorum =
				SignerQuorum::new(perm.into_iter().map(local).collect()).unwrap();
			let signatures = quorum.sign(&message()).await.unwrap();

			for pair in signatures.windows(2) {
				assert!(pair[0].signer < pair[1].signer);
			}
			outputs.push(signatures);
		}

		assert_eq!(outputs[0], outputs[1]);
		assert_eq!(outputs[1], outputs[2]);
	}

	#[tokio::test]
	async fn test_duplicate_addresses_are_rejected() {
		let result = SignerQuorum::new(vec![local(7), local(7)]);
		assert!(matches!(result, Err(AccountError::DuplicateSigner(_))));
	}

	#[tokio::test]
	async fn test_quorum_failure_is_atomic() {
		let quorum = SignerQuorum::new(vec![local(1), Arc::new(FailingSigner)]).unwrap();
		let result = quorum.sign(&message()).await;
		assert!(matches!(result, Err(AccountError::SigningFailed(_))));
	}

	#[tokio::test]
	async fn test_empty_quorum_signs_to_empty_list() {
		let quorum = SignerQuorum::new(vec![]).unwrap();
		assert!(quorum.is_empty());
		assert!(quorum.sign(&message()).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_each_signer_signs_the_same_digest() {
		let quorum = SignerQuorum::new(vec![local(1), local(2)]).unwrap();
		let signatures = quorum.sign(&message()).await.unwrap();

		assert_eq!(signatures.len(), 2);
		assert_ne!(signatures[0].bytes, signatures[1].bytes);
		assert_ne!(signatures[0].signer, signatures[1].signer);
	}
}
