//! Canonical message encoding.
//!
//! A qualifying event's seven fields are packed into a fixed 160-byte layout:
//! four 32-byte fields (source domain, target domain, receiver, operator)
//! followed by a 128-bit amount, an 80-bit nonce, and a 48-bit timestamp,
//! big-endian, with no separators. The message hash is the keccak256 digest
//! of those bytes. Identical input always produces identical output; the
//! downstream mint authorization depends on that.

use crate::errors::{OracleError, Result};
use crate::events::parse_felt;
use alloy_primitives::{keccak256, B256, U256};
use serde::{Deserialize, Serialize};

/// Number of fields a transfer event carries.
pub const GUID_FIELDS: usize = 7;

/// Packed length of an encoded message in bytes.
pub const ENCODED_LEN: usize = 4 * 32 + 16 + 10 + 6;

/// Layout variant for the two first fields. The source chain historically
/// emitted domain identifiers as short strings, which the legacy layout
/// right-zero-pads into their 32-byte slots; the direct layout takes every
/// field as a left-padded fixed-width value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
	Direct,
	Legacy,
}

/// A canonically encoded transfer message and its content hash.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedMessage {
	pub bytes: Vec<u8>,
	pub hash: B256,
}

impl EncodedMessage {
	/// Message bytes as hex, without a `0x` prefix.
	pub fn event_hex(&self) -> String {
		hex::encode(&self.bytes)
	}

	/// Content hash as hex, without a `0x` prefix.
	pub fn hash_hex(&self) -> String {
		hex::encode(self.hash)
	}
}

/// Encodes a qualifying event's fields into the canonical layout.
///
/// Fails if the field count is wrong, a field does not parse as a felt
/// value, or a numeric field exceeds its declared bit width. Values are
/// never truncated.
pub fn encode(fields: &[String], kind: MessageKind) -> Result<EncodedMessage> {
	if fields.len() != GUID_FIELDS {
		return Err(OracleError::Encoding(format!(
			"expected {} fields, got {}",
			GUID_FIELDS,
			fields.len()
		)));
	}

	let mut bytes = Vec::with_capacity(ENCODED_LEN);

	for (i, field) in fields.iter().take(4).enumerate() {
		let value = parse_felt(field)?;
		let word = match (kind, i) {
			(MessageKind::Legacy, 0 | 1) => right_padded(value),
			_ => B256::from(value.to_be_bytes::<32>()),
		};
		bytes.extend_from_slice(word.as_slice());
	}

	bytes.extend_from_slice(&bounded(&fields[4], "amount", 128)?[16..]);
	bytes.extend_from_slice(&bounded(&fields[5], "nonce", 80)?[22..]);
	bytes.extend_from_slice(&bounded(&fields[6], "timestamp", 48)?[26..]);

	let hash = keccak256(&bytes);
	Ok(EncodedMessage { bytes, hash })
}

/// Parses a numeric field and enforces its bit width, returning the value
/// as 32 big-endian bytes for slicing into the packed layout.
fn bounded(field: &str, name: &str, bits: usize) -> Result<[u8; 32]> {
	let value = parse_felt(field)?;
	if value >= U256::from(1u8) << bits {
		return Err(OracleError::Encoding(format!(
			"{} {} exceeds {} bits",
			name, field, bits
		)));
	}
	Ok(value.to_be_bytes::<32>())
}

/// The value's minimal big-endian bytes, right-zero-padded into 32 bytes.
fn right_padded(value: U256) -> B256 {
	let be = value.to_be_bytes::<32>();
	let start = be.iter().position(|b| *b != 0).unwrap_or(32);
	let mut out = [0u8; 32];
	out[..32 - start].copy_from_slice(&be[start..]);
	B256::from(out)
}

/// The decoded business object of a transfer event. Field widths are
/// enforced at construction, so a value of this type always fits the
/// canonical layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferGuid {
	pub source_domain: B256,
	pub target_domain: B256,
	pub receiver: B256,
	pub operator: B256,
	pub amount: u128,
	pub nonce: u128,
	pub timestamp: u64,
}

impl TransferGuid {
	#[allow(clippy::too_many_arguments)]
	pub fn new(
		source_domain: B256,
		target_domain: B256,
		receiver: B256,
		operator: B256,
		amount: u128,
		nonce: u128,
		timestamp: u64,
	) -> Result<Self> {
		if nonce >= 1u128 << 80 {
			return Err(OracleError::Encoding(format!(
				"nonce {} exceeds 80 bits",
				nonce
			)));
		}
		if timestamp >= 1u64 << 48 {
			return Err(OracleError::Encoding(format!(
				"timestamp {} exceeds 48 bits",
				timestamp
			)));
		}
		Ok(Self {
			source_domain,
			target_domain,
			receiver,
			operator,
			amount,
			nonce,
			timestamp,
		})
	}

	/// Reconstructs the GUID from the canonical byte layout. Lossless for
	/// every message produced by [`encode`].
	pub fn decode(bytes: &[u8]) -> Result<Self> {
		if bytes.len() != ENCODED_LEN {
			return Err(OracleError::Encoding(format!(
				"expected {} encoded bytes, got {}",
				ENCODED_LEN,
				bytes.len()
			)));
		}

		let word = |i: usize| B256::from_slice(&bytes[i * 32..(i + 1) * 32]);

		let mut amount = [0u8; 16];
		amount.copy_from_slice(&bytes[128..144]);

		let mut nonce = [0u8; 16];
		nonce[6..].copy_from_slice(&bytes[144..154]);

		let mut timestamp = [0u8; 8];
		timestamp[2..].copy_from_slice(&bytes[154..160]);

		Ok(Self {
			source_domain: word(0),
			target_domain: word(1),
			receiver: word(2),
			operator: word(3),
			amount: u128::from_be_bytes(amount),
			nonce: u128::from_be_bytes(nonce),
			timestamp: u64::from_be_bytes(timestamp),
		})
	}
}
