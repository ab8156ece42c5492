//! Event extraction and filtering.
//!
//! The transfer-initialization event is recognized by the contract address
//! that emitted it and by its first key, which carries the selector derived
//! from the configured event name. Addresses and keys arrive as felt-valued
//! strings in unnormalized form, so all comparisons happen on numeric values.

use crate::errors::{OracleError, Result};
use alloy_primitives::{keccak256, U256};

/// An on-chain event with its `(transaction, index)` identity attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainEvent {
	pub transaction_hash: String,
	pub log_index: u64,
	pub from_address: String,
	pub keys: Vec<String>,
	pub data: Vec<String>,
}

/// Parses a felt-valued string: `0x`-prefixed hex or bare decimal.
pub fn parse_felt(value: &str) -> Result<U256> {
	let value = value.trim();
	let (digits, radix) = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
		Some(hex) => (hex, 16),
		None => (value, 10),
	};

	if digits.is_empty() {
		return Err(OracleError::Encoding(format!(
			"empty numeric value {:?}",
			value
		)));
	}

	U256::from_str_radix(digits, radix)
		.map_err(|e| OracleError::Encoding(format!("invalid numeric value {:?}: {}", value, e)))
}

/// Derives the event selector for a name: the keccak256 digest of the name,
/// truncated into the 250-bit felt space. Stable and pure, so the same name
/// always yields the same selector.
pub fn selector_from_name(name: &str) -> U256 {
	let mask = (U256::from(1u8) << 250) - U256::from(1u8);
	U256::from_be_bytes(keccak256(name.as_bytes()).0) % mask
}

/// True iff the event was emitted by the gateway contract and its first key
/// is the expected selector. An address or key that does not parse as a felt
/// cannot match anything.
pub fn is_qualifying(event: &ChainEvent, gateway: U256, selector: U256) -> bool {
	let from = match parse_felt(&event.from_address) {
		Ok(v) => v,
		Err(_) => return false,
	};

	let first_key = match event.keys.first().map(|k| parse_felt(k)) {
		Some(Ok(v)) => v,
		_ => return false,
	};

	from == gateway && first_key == selector
}
