//! Wire shapes returned by the upstream chain's query endpoint.
//!
//! The oracle only reads what the attestation pipeline needs: a receipt's
//! transaction hash and event list, and a block's transaction set. Every
//! other field the sequencer serves is optional here and ignored if absent.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Block selector for the feeder gateway: a concrete height or the
/// sequencer's "pending" block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
	Pending,
	Number(u64),
}

impl fmt::Display for BlockTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			BlockTag::Pending => write!(f, "pending"),
			BlockTag::Number(n) => write!(f, "{}", n),
		}
	}
}

/// A raw event exactly as the sequencer serializes it. Keys and data are
/// felt-valued strings in whatever hex/decimal form the chain emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
	pub from_address: String,
	#[serde(default)]
	pub keys: Vec<String>,
	#[serde(default)]
	pub data: Vec<String>,
}

/// Transaction receipt as served by the feeder gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionReceipt {
	pub transaction_hash: String,
	#[serde(default)]
	pub events: Vec<RawEvent>,
}

impl TransactionReceipt {
	/// Attaches `(transaction, index)` identity to each raw event.
	pub fn chain_events(&self) -> Vec<crate::events::ChainEvent> {
		self.events
			.iter()
			.enumerate()
			.map(|(i, e)| crate::events::ChainEvent {
				transaction_hash: self.transaction_hash.clone(),
				log_index: i as u64,
				from_address: e.from_address.clone(),
				keys: e.keys.clone(),
				data: e.data.clone(),
			})
			.collect()
	}
}

/// Block as served by the feeder gateway. Transactions stay opaque; the
/// poller only compares them structurally across ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
	#[serde(default)]
	pub block_hash: Option<String>,
	#[serde(default)]
	pub parent_block_hash: Option<String>,
	#[serde(default)]
	pub status: Option<String>,
	#[serde(default)]
	pub block_number: Option<u64>,
	#[serde(default)]
	pub timestamp: Option<u64>,
	#[serde(default)]
	pub transactions: Vec<serde_json::Value>,
	#[serde(default)]
	pub transaction_receipts: Vec<TransactionReceipt>,
}
