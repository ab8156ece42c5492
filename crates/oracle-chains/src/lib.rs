//! Chain access for the oracle.
//!
//! The [`ChainSource`] trait is the seam the attestation pipeline consumes;
//! [`FeederClient`] is its production implementation against a sequencer's
//! feeder-gateway read API.

mod feeder;

pub use feeder::FeederClient;

use async_trait::async_trait;
use oracle_types::{Block, BlockTag, Result, TransactionReceipt};

/// Read access to the upstream chain.
#[async_trait]
pub trait ChainSource: Send + Sync {
	/// Fetches a block by height or the sequencer's pending block.
	async fn fetch_block(&self, block: BlockTag) -> Result<Block>;

	/// Fetches the receipt for a transaction hash.
	async fn fetch_transaction_receipt(&self, tx_hash: &str) -> Result<TransactionReceipt>;
}
