//! Attestation wire shapes.
//!
//! One attestation bundles a signer's signature with the canonical encoding
//! it covers, in the exact JSON shape the downstream relayer consumes. Hex
//! strings carry no `0x` prefix.

use crate::message::EncodedMessage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attestation {
	/// Observation time in epoch milliseconds.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub timestamp: Option<u64>,
	pub data: AttestationData,
	pub signatures: SignatureSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttestationData {
	/// Canonical message bytes as hex.
	pub event: String,
	/// keccak256 digest of the message bytes as hex.
	pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureSet {
	pub ethereum: EthereumSignature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthereumSignature {
	/// 65-byte (r, s, v) signature as hex.
	pub signature: String,
	/// Signer address as hex.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub signer: Option<String>,
}

impl Attestation {
	pub fn new(
		message: &EncodedMessage,
		signer: String,
		signature: String,
		timestamp: u64,
	) -> Self {
		Self {
			timestamp: Some(timestamp),
			data: AttestationData {
				event: message.event_hex(),
				hash: message.hash_hex(),
			},
			signatures: SignatureSet {
				ethereum: EthereumSignature {
					signature,
					signer: Some(signer),
				},
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::message::{encode, MessageKind};

	#[test]
	fn test_wire_shape() {
		let fields: Vec<String> = vec!["0x1", "0x2", "0x3", "0x4", "5", "6", "7"]
			.into_iter()
			.map(String::from)
			.collect();
		let message = encode(&fields, MessageKind::Direct).unwrap();
		let attestation = Attestation::new(
			&message,
			"aabb".to_string(),
			"ccdd".to_string(),
			1_700_000_000_000,
		);

		let json = serde_json::to_value(&attestation).unwrap();
		assert_eq!(json["timestamp"], 1_700_000_000_000u64);
		assert_eq!(json["data"]["event"], message.event_hex());
		assert_eq!(json["data"]["hash"], message.hash_hex());
		assert_eq!(json["signatures"]["ethereum"]["signature"], "ccdd");
		assert_eq!(json["signatures"]["ethereum"]["signer"], "aabb");
		assert!(!json["data"]["event"].as_str().unwrap().starts_with("0x"));
	}

	#[test]
	fn test_optional_fields_are_omitted() {
		let attestation = Attestation {
			timestamp: None,
			data: AttestationData {
				event: "00".to_string(),
				hash: "11".to_string(),
			},
			signatures: SignatureSet {
				ethereum: EthereumSignature {
					signature: "22".to_string(),
					signer: None,
				},
			},
		};

		let json = serde_json::to_value(&attestation).unwrap();
		assert!(json.get("timestamp").is_none());
		assert!(json["signatures"]["ethereum"].get("signer").is_none());
	}
}
