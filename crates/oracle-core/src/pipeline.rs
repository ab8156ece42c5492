//! Shared extraction, filtering, encoding, and signing chain.

use alloy_primitives::U256;
use chrono::Utc;
use oracle_account::SignerQuorum;
use oracle_chains::ChainSource;
use oracle_types::{
	encode, is_qualifying, parse_felt, selector_from_name, Attestation, ChainEvent, MessageKind,
	OracleError, Result, TransactionReceipt, TransferGuid,
};
use std::sync::Arc;
use tracing::{debug, info};

/// The attestation pipeline.
///
/// Everything here is rebuilt per request: a repeat query for the same
/// transaction recomputes the encoding and signatures from scratch, and the
/// deterministic encoder and signer ordering make the result byte-identical.
pub struct AttestationPipeline {
	chain: Arc<dyn ChainSource>,
	quorum: Arc<SignerQuorum>,
	gateway: U256,
	selector: U256,
	message_kind: MessageKind,
}

impl AttestationPipeline {
	pub fn new(
		chain: Arc<dyn ChainSource>,
		quorum: Arc<SignerQuorum>,
		gateway_address: &str,
		event_name: &str,
		message_kind: MessageKind,
	) -> Result<Self> {
		let gateway = parse_felt(gateway_address)
			.map_err(|e| OracleError::Config(format!("invalid gateway address: {}", e)))?;

		Ok(Self {
			chain,
			quorum,
			gateway,
			selector: selector_from_name(event_name),
			message_kind,
		})
	}

	/// On-demand mode: fetch the receipt for `tx_hash`, find its first
	/// qualifying event, and return one attestation per configured signer.
	/// The first error encountered aborts the request; no partial results.
	pub async fn attest_transaction(&self, tx_hash: &str) -> Result<Vec<Attestation>> {
		let receipt = self.chain.fetch_transaction_receipt(tx_hash).await?;

		let event = self
			.qualifying_event(&receipt)
			.ok_or_else(|| OracleError::EventNotFound(tx_hash.to_string()))?;

		self.attest_event(&event).await
	}

	/// The first event in the receipt emitted by the gateway with the
	/// expected selector. Later qualifying events are never used; a receipt
	/// with none yields `None`, never a fallback.
	pub fn qualifying_event(&self, receipt: &TransactionReceipt) -> Option<ChainEvent> {
		receipt
			.chain_events()
			.into_iter()
			.find(|e| is_qualifying(e, self.gateway, self.selector))
	}

	/// Encodes one qualifying event, signs it with the quorum, and assembles
	/// the ordered attestation list, all stamped with the same observation
	/// time.
	pub async fn attest_event(&self, event: &ChainEvent) -> Result<Vec<Attestation>> {
		let message = encode(&event.data, self.message_kind)?;

		let guid = TransferGuid::decode(&message.bytes)?;
		debug!(
			amount = %guid.amount,
			nonce = %guid.nonce,
			timestamp = guid.timestamp,
			"Decoded transfer from event {}/{}",
			event.transaction_hash,
			event.log_index
		);

		let signatures = self
			.quorum
			.sign(&message)
			.await
			.map_err(|e| OracleError::Signing(e.to_string()))?;

		let observed_at = Utc::now().timestamp_millis() as u64;
		let attestations = signatures
			.into_iter()
			.map(|s| Attestation::new(&message, s.signer_hex(), s.signature_hex(), observed_at))
			.collect();

		info!("Generated attestations for transfer {}", message.hash_hex());
		Ok(attestations)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::keccak256;
	use async_trait::async_trait;
	use oracle_account::{LocalSigner, SignerInterface};
	use oracle_types::{Block, BlockTag, RawEvent};
	use std::collections::HashMap;

	const GATEWAY: &str = "0xdeadbeef";
	const EVENT_NAME: &str = "TransferInitialized";

	fn selector_key() -> String {
		format!("0x{:x}", selector_from_name(EVENT_NAME))
	}

	fn transfer_event() -> RawEvent {
		RawEvent {
			from_address: GATEWAY.to_string(),
			keys: vec![selector_key()],
			data: vec![
				"0x534f55524345",
				"0x544152474554",
				"0x1234",
				"0x5678",
				"1000000000000000000",
				"42",
				"1700000000",
			]
			.into_iter()
			.map(String::from)
			.collect(),
		}
	}

	/// Serves receipts from a map; everything else is an unknown transaction.
	struct MockChain {
		receipts: HashMap<String, TransactionReceipt>,
	}

	impl MockChain {
		fn with_receipt(tx_hash: &str, events: Vec<RawEvent>) -> Self {
			let mut receipts = HashMap::new();
			receipts.insert(
				tx_hash.to_string(),
				TransactionReceipt {
					transaction_hash: tx_hash.to_string(),
					events,
				},
			);
			Self { receipts }
		}
	}

	#[async_trait]
	impl ChainSource for MockChain {
		async fn fetch_block(&self, block: BlockTag) -> Result<Block> {
			Err(OracleError::ChainFetch {
				what: format!("block {}", block),
				reason: "not supported by mock".to_string(),
			})
		}

		async fn fetch_transaction_receipt(&self, tx_hash: &str) -> Result<TransactionReceipt> {
			self.receipts
				.get(tx_hash)
				.cloned()
				.ok_or_else(|| OracleError::ChainFetch {
					what: format!("transaction {}", tx_hash),
					reason: "unknown transaction hash".to_string(),
				})
		}
	}

	fn signer(key_byte: u8) -> Arc<dyn SignerInterface> {
		let mut key = [0u8; 32];
		key[31] = key_byte;
		Arc::new(LocalSigner::from_private_key(&hex::encode(key)).unwrap())
	}

	fn pipeline_with(
		chain: MockChain,
		signers: Vec<Arc<dyn SignerInterface>>,
	) -> AttestationPipeline {
		AttestationPipeline::new(
			Arc::new(chain),
			Arc::new(SignerQuorum::new(signers).unwrap()),
			GATEWAY,
			EVENT_NAME,
			MessageKind::Direct,
		)
		.unwrap()
	}

	#[tokio::test]
	async fn test_two_signer_quorum_yields_two_attestations_over_one_hash() {
		let chain = MockChain::with_receipt("0xabc", vec![transfer_event()]);
		let pipeline = pipeline_with(chain, vec![signer(1), signer(2)]);

		let attestations = pipeline.attest_transaction("0xabc").await.unwrap();
		assert_eq!(attestations.len(), 2);

		// Both entries attest the same encoding, and the hash really is the
		// digest of the shared event bytes.
		assert_eq!(attestations[0].data, attestations[1].data);
		let event_bytes = hex::decode(&attestations[0].data.event).unwrap();
		assert_eq!(
			attestations[0].data.hash,
			hex::encode(keccak256(&event_bytes))
		);

		// Distinct signers, distinct signatures.
		assert_ne!(
			attestations[0].signatures.ethereum.signer,
			attestations[1].signatures.ethereum.signer
		);
		assert_ne!(
			attestations[0].signatures.ethereum.signature,
			attestations[1].signatures.ethereum.signature
		);
	}

	#[tokio::test]
	async fn test_repeat_queries_are_byte_identical() {
		let chain = MockChain::with_receipt("0xabc", vec![transfer_event()]);
		let pipeline = pipeline_with(chain, vec![signer(1), signer(2)]);

		let first = pipeline.attest_transaction("0xabc").await.unwrap();
		let second = pipeline.attest_transaction("0xabc").await.unwrap();

		for (a, b) in first.iter().zip(&second) {
			assert_eq!(a.data, b.data);
			assert_eq!(a.signatures, b.signatures);
		}
	}

	#[tokio::test]
	async fn test_no_qualifying_event_reports_event_not_found() {
		let stranger = RawEvent {
			from_address: "0x999".to_string(),
			keys: vec![selector_key()],
			data: vec![],
		};
		let wrong_selector = RawEvent {
			from_address: GATEWAY.to_string(),
			keys: vec![format!("0x{:x}", selector_from_name("SomethingElse"))],
			data: vec![],
		};
		let chain = MockChain::with_receipt("0xabc", vec![stranger, wrong_selector]);
		let pipeline = pipeline_with(chain, vec![signer(1)]);

		let err = pipeline.attest_transaction("0xabc").await.unwrap_err();
		assert!(matches!(err, OracleError::EventNotFound(_)));
	}

	#[tokio::test]
	async fn test_unknown_transaction_propagates_chain_fetch_error() {
		let chain = MockChain::with_receipt("0xabc", vec![transfer_event()]);
		let pipeline = pipeline_with(chain, vec![signer(1)]);

		let err = pipeline.attest_transaction("0xmissing").await.unwrap_err();
		assert!(matches!(err, OracleError::ChainFetch { .. }));
	}

	#[tokio::test]
	async fn test_malformed_event_data_fails_encoding() {
		let mut event = transfer_event();
		event.data.truncate(5);
		let chain = MockChain::with_receipt("0xabc", vec![event]);
		let pipeline = pipeline_with(chain, vec![signer(1)]);

		let err = pipeline.attest_transaction("0xabc").await.unwrap_err();
		assert!(matches!(err, OracleError::Encoding(_)));
	}

	#[tokio::test]
	async fn test_first_qualifying_event_wins() {
		let mut second = transfer_event();
		second.data[4] = "999".to_string();
		let chain = MockChain::with_receipt("0xabc", vec![transfer_event(), second]);
		let pipeline = pipeline_with(chain, vec![signer(1)]);

		let attestations = pipeline.attest_transaction("0xabc").await.unwrap();
		let event_bytes = hex::decode(&attestations[0].data.event).unwrap();
		let guid = TransferGuid::decode(&event_bytes).unwrap();
		assert_eq!(guid.amount, 1_000_000_000_000_000_000);
	}

	#[tokio::test]
	async fn test_zero_signer_quorum_yields_empty_list() {
		let chain = MockChain::with_receipt("0xabc", vec![transfer_event()]);
		let pipeline = pipeline_with(chain, vec![]);

		let attestations = pipeline.attest_transaction("0xabc").await.unwrap();
		assert!(attestations.is_empty());
	}
}
