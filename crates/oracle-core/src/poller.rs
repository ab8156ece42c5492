//! Continuous polling over the pending block.

use crate::AttestationPipeline;
use oracle_chains::ChainSource;
use oracle_types::{Attestation, BlockTag, Result};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Serialized pending-block poller.
///
/// One tick fetches the pending block and, only when its transaction set
/// differs structurally from the previous tick's, runs every receipt through
/// the shared pipeline. The previous transaction set is the only cross-tick
/// state, and it exists to avoid redundant signing work, not for
/// correctness. Ticks never overlap: the loop awaits each tick to completion
/// before the timer schedules the next.
pub struct Poller {
	chain: Arc<dyn ChainSource>,
	pipeline: Arc<AttestationPipeline>,
	period: Duration,
	last_transactions: Option<Vec<serde_json::Value>>,
}

impl Poller {
	pub fn new(
		chain: Arc<dyn ChainSource>,
		pipeline: Arc<AttestationPipeline>,
		period: Duration,
	) -> Self {
		Self {
			chain,
			pipeline,
			period,
			last_transactions: None,
		}
	}

	/// Runs the polling loop until the receiving side of `sink` is dropped.
	/// A failed tick is logged and the loop keeps going.
	pub async fn run(mut self, sink: mpsc::UnboundedSender<Vec<Attestation>>) {
		info!("Starting pending-block polling every {:?}", self.period);

		let mut ticker = interval(self.period);
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

		loop {
			ticker.tick().await;

			if sink.is_closed() {
				info!("Attestation consumer dropped, stopping poller");
				return;
			}

			if let Err(e) = self.poll_once(&sink).await {
				warn!("Polling tick failed: {}", e);
			}
		}
	}

	/// One polling iteration: fetch the pending block, skip it entirely if
	/// its transaction set is unchanged, otherwise attest every qualifying
	/// event, suppressing duplicates by transaction identity and by
	/// `(transaction, event index)` within the tick.
	pub async fn poll_once(
		&mut self,
		sink: &mpsc::UnboundedSender<Vec<Attestation>>,
	) -> Result<()> {
		let block = self.chain.fetch_block(BlockTag::Pending).await?;

		if self.last_transactions.as_ref() == Some(&block.transactions) {
			debug!("Pending block transactions unchanged, skipping tick");
			return Ok(());
		}
		self.last_transactions = Some(block.transactions.clone());

		let mut seen_transactions: HashSet<String> = HashSet::new();
		let mut seen_events: HashSet<(String, u64)> = HashSet::new();

		for receipt in &block.transaction_receipts {
			if !seen_transactions.insert(receipt.transaction_hash.clone()) {
				continue;
			}

			let event = match self.pipeline.qualifying_event(receipt) {
				Some(event) => event,
				None => continue,
			};

			if !seen_events.insert((event.transaction_hash.clone(), event.log_index)) {
				continue;
			}

			// A bad transaction must not take the poller down with it.
			match self.pipeline.attest_event(&event).await {
				Ok(attestations) => {
					if sink.send(attestations).is_err() {
						return Ok(());
					}
				}
				Err(e) => warn!(
					"Failed to attest transaction {}: {}",
					receipt.transaction_hash, e
				),
			}
		}

		Ok(())
	}
}
