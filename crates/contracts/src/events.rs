//! Watcher for `BatchProposed` events on the inbox.

use crate::{abi::inbox, ContractError};
use alloy_primitives::Address;
use alloy_provider::{DynProvider, Provider};
use alloy_rpc_types_eth::Filter;
use alloy_sol_types::SolEvent;
use std::time::Duration;

/// Default deadline for the blocking batch waiter.
pub const BATCH_PROPOSED_TIMEOUT: Duration = Duration::from_secs(100);

/// A decoded `BatchProposed` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposedBatch {
    /// The id of the proposed batch.
    pub batch_id: u64,
    /// The operator that proposed the batch.
    pub proposer: Address,
    /// L1 timestamp at which the batch was proposed.
    pub proposed_at: u64,
    /// The last L2 block covered by the batch.
    pub last_block_id: u64,
    /// The timestamp of that last L2 block.
    pub last_block_timestamp: u64,
    /// The L1 block the event was emitted in.
    pub l1_block_number: u64,
}

impl ProposedBatch {
    fn from_log(log: &alloy_rpc_types_eth::Log) -> Option<Self> {
        let decoded = inbox::BatchProposed::decode_log(&log.inner).ok()?;
        Some(Self {
            batch_id: decoded.data.meta.batchId,
            proposer: decoded.data.meta.proposer,
            proposed_at: decoded.data.meta.proposedAt,
            last_block_id: decoded.data.info.lastBlockId,
            last_block_timestamp: decoded.data.info.lastBlockTimestamp,
            l1_block_number: log.block_number?,
        })
    }
}

/// Returns the most recent `BatchProposed` event emitted by the inbox at or
/// after `from_block`, or `None` when no batch has been proposed yet.
///
/// Single non-blocking log query; the caller decides whether absence is a
/// failure.
pub async fn last_batch_proposed_since(
    provider: &DynProvider,
    inbox_address: Address,
    from_block: u64,
) -> Result<Option<ProposedBatch>, ContractError> {
    let filter = Filter::new()
        .address(inbox_address)
        .event_signature(inbox::BatchProposed::SIGNATURE_HASH)
        .from_block(from_block);
    let logs = provider.get_logs(&filter).await?;
    Ok(logs.iter().rev().find_map(ProposedBatch::from_log))
}

/// Polls once per second for a `BatchProposed` event at or after
/// `from_block` carrying a batch id greater than `after_batch_id`, failing
/// hard with [`ContractError::NoBatchProposed`] when the timeout elapses
/// first.
///
/// The id guard filters events emitted in `from_block` itself before the
/// caller read its batch baseline.
pub async fn wait_for_batch_proposed(
    provider: &DynProvider,
    inbox_address: Address,
    from_block: u64,
    after_batch_id: u64,
    timeout: Duration,
) -> Result<ProposedBatch, ContractError> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let batch = last_batch_proposed_since(provider, inbox_address, from_block).await?;
        if let Some(batch) = batch.filter(|batch| batch.batch_id > after_batch_id) {
            tracing::info!(
                target: "preconf::contracts",
                batch_id = batch.batch_id,
                l1_block = batch.l1_block_number,
                "observed BatchProposed event"
            );
            return Ok(batch);
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(ContractError::NoBatchProposed {
                from_block,
                waited_secs: timeout.as_secs(),
            });
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}
