//! Local wallet signer backed by Alloy.

use crate::{AccountError, SignerInterface};
use alloy_primitives::{Address, B256};
use alloy_signer::Signer;
use alloy_signer_local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use async_trait::async_trait;

/// A signer holding its private key in process memory.
///
/// Keys are derived from a BIP-39 mnemonic or parsed from a raw hex private
/// key. Signing handles the EIP-191 personal-message prefix internally via
/// Alloy's signer.
pub struct LocalSigner {
	signer: PrivateKeySigner,
}

impl LocalSigner {
	/// Creates a signer from a hex private key, with or without `0x` prefix.
	pub fn from_private_key(private_key_hex: &str) -> Result<Self, AccountError> {
		let signer = private_key_hex
			.parse::<PrivateKeySigner>()
			.map_err(|e| AccountError::InvalidKey(format!("Invalid private key: {}", e)))?;

		Ok(Self { signer })
	}

	/// Derives a signer from a BIP-39 mnemonic at the given account index.
	pub fn from_mnemonic(phrase: &str, index: u32) -> Result<Self, AccountError> {
		let signer = MnemonicBuilder::<English>::default()
			.phrase(phrase)
			.index(index)
			.map_err(|e| AccountError::InvalidKey(format!("Invalid derivation index: {}", e)))?
			.build()
			.map_err(|e| AccountError::InvalidKey(format!("Invalid mnemonic: {}", e)))?;

		Ok(Self { signer })
	}
}

#[async_trait]
impl SignerInterface for LocalSigner {
	fn address(&self) -> Address {
		self.signer.address()
	}

	async fn sign_digest(&self, digest: B256) -> Result<[u8; 65], AccountError> {
		let signature = self
			.signer
			.sign_message(digest.as_slice())
			.await
			.map_err(|e| AccountError::SigningFailed(e.to_string()))?;

		// Standard Ethereum signature layout: r, s, then v as 27/28.
		let mut bytes = [0u8; 65];
		bytes[..32].copy_from_slice(&signature.r().to_be_bytes::<32>());
		bytes[32..64].copy_from_slice(&signature.s().to_be_bytes::<32>());
		bytes[64] = if signature.v() { 28 } else { 27 };
		Ok(bytes)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	// Standard development mnemonic and its account #0 private key.
	const MNEMONIC: &str = "test test test test test test test test test test test junk";
	const ACCOUNT0_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	#[test]
	fn test_mnemonic_and_private_key_agree() {
		let from_mnemonic = LocalSigner::from_mnemonic(MNEMONIC, 0).unwrap();
		let from_key = LocalSigner::from_private_key(ACCOUNT0_KEY).unwrap();
		assert_eq!(from_mnemonic.address(), from_key.address());
	}

	#[test]
	fn test_mnemonic_indices_derive_distinct_addresses() {
		let a = LocalSigner::from_mnemonic(MNEMONIC, 0).unwrap();
		let b = LocalSigner::from_mnemonic(MNEMONIC, 1).unwrap();
		assert_ne!(a.address(), b.address());
	}

	#[test]
	fn test_rejects_bad_credentials() {
		assert!(LocalSigner::from_private_key("0xnothex").is_err());
		assert!(LocalSigner::from_mnemonic("not a mnemonic", 0).is_err());
	}

	#[tokio::test]
	async fn test_signature_format() {
		let signer = LocalSigner::from_private_key(ACCOUNT0_KEY).unwrap();
		let digest = B256::repeat_byte(0x11);

		let bytes = signer.sign_digest(digest).await.unwrap();
		assert!(bytes[64] == 27 || bytes[64] == 28);
		assert_ne!(&bytes[..32], &[0u8; 32]);
		assert_ne!(&bytes[32..64], &[0u8; 32]);
	}

	#[tokio::test]
	async fn test_signing_is_deterministic() {
		let signer = LocalSigner::from_private_key(ACCOUNT0_KEY).unwrap();
		let digest = B256::repeat_byte(0x22);

		let a = signer.sign_digest(digest).await.unwrap();
		let b = signer.sign_digest(digest).await.unwrap();
		assert_eq!(a, b);

		let c = signer.sign_digest(B256::repeat_byte(0x23)).await.unwrap();
		assert_ne!(a, c);
	}
}
