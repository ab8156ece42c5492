//! Feeder-gateway HTTP client.

use crate::ChainSource;
use async_trait::async_trait;
use oracle_types::{Block, BlockTag, OracleError, Result, TransactionReceipt};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Client for a sequencer's feeder-gateway read API.
///
/// Every call is a single network read; transport failures, non-success
/// statuses, and unparsable bodies surface as [`OracleError::ChainFetch`]
/// carrying the requested identifier. Retry policy, if any, belongs to the
/// caller.
pub struct FeederClient {
	client: reqwest::Client,
	base_url: String,
}

impl FeederClient {
	/// Creates a client for the given sequencer. A bare host is reached over
	/// https; an explicit scheme is kept as-is.
	pub fn new(server: &str) -> Self {
		let base_url = if server.contains("://") {
			server.trim_end_matches('/').to_string()
		} else {
			format!("https://{}", server)
		};

		Self {
			client: reqwest::Client::new(),
			base_url,
		}
	}

	async fn get_json<T: DeserializeOwned>(&self, url: String, what: String) -> Result<T> {
		let response = self
			.client
			.get(&url)
			.send()
			.await
			.map_err(|e| OracleError::ChainFetch {
				what: what.clone(),
				reason: e.to_string(),
			})?;

		let status = response.status();
		if !status.is_success() {
			return Err(OracleError::ChainFetch {
				what,
				reason: format!("unexpected status {}", status),
			});
		}

		response.json::<T>().await.map_err(|e| OracleError::ChainFetch {
			what,
			reason: format!("unparsable body: {}", e),
		})
	}
}

#[async_trait]
impl ChainSource for FeederClient {
	async fn fetch_block(&self, block: BlockTag) -> Result<Block> {
		debug!("Fetching block {}", block);
		let url = format!(
			"{}/feeder_gateway/get_block?blockNumber={}",
			self.base_url, block
		);
		self.get_json(url, format!("block {}", block)).await
	}

	async fn fetch_transaction_receipt(&self, tx_hash: &str) -> Result<TransactionReceipt> {
		debug!("Retrieving transaction {}", tx_hash);
		let url = format!(
			"{}/feeder_gateway/get_transaction_receipt?transactionHash={}",
			self.base_url, tx_hash
		);
		self.get_json(url, format!("transaction {}", tx_hash)).await
	}
}
