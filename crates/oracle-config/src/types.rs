//! Configuration types for the oracle.

use oracle_types::MessageKind;
use serde::{Deserialize, Serialize};

/// Complete oracle configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OracleConfig {
	/// Oracle identity and message layout.
	pub oracle: OracleSettings,
	/// Upstream chain to watch.
	pub chain: ChainSettings,
	/// Signer credentials; one attestation is produced per entry.
	#[serde(default)]
	pub signers: Vec<SignerSettings>,
	/// Query API settings.
	#[serde(default)]
	pub api: ApiSettings,
	/// Continuous poller settings.
	#[serde(default)]
	pub poller: PollerSettings,
}

/// Oracle identity and message layout.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OracleSettings {
	/// Service name for logging.
	pub name: String,
	/// Protocol tag a query's `type` parameter must match.
	pub protocol: String,
	/// Canonical layout variant for encoded messages.
	pub message_kind: MessageKind,
}

/// Upstream chain configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainSettings {
	/// Sequencer host serving the feeder gateway, e.g. `alpha4.starknet.io`.
	pub server: String,
	/// Gateway contract whose events qualify, as a felt-valued hex string.
	pub gateway_address: String,
	/// Event name the selector is derived from.
	pub event_name: String,
}

/// One signer's credentials. Exactly one of `mnemonic` and `private_key`
/// must be set.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignerSettings {
	/// BIP-39 mnemonic phrase.
	pub mnemonic: Option<String>,
	/// Derivation index under the mnemonic's default path.
	pub index: Option<u32>,
	/// Raw hex private key, with or without `0x` prefix.
	pub private_key: Option<String>,
}

/// Query API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
	pub enabled: bool,
	pub host: String,
	pub port: u16,
}

impl Default for ApiSettings {
	fn default() -> Self {
		Self {
			enabled: true,
			host: "0.0.0.0".to_string(),
			port: 8080,
		}
	}
}

/// Continuous poller configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollerSettings {
	pub enabled: bool,
	/// Period between pending-block fetches, in seconds.
	pub poll_interval_secs: u64,
}

impl Default for PollerSettings {
	fn default() -> Self {
		Self {
			enabled: false,
			poll_interval_secs: 10,
		}
	}
}
