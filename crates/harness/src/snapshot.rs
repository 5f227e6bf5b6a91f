//! Point-in-time snapshots of chain state.

use crate::HarnessError;
use alloy_primitives::{Address, B256};
use alloy_provider::{DynProvider, Provider};
use alloy_rpc_types_eth::BlockNumberOrTag;
use preconf_contracts::last_batch_id;

/// A snapshot of the chain state a scenario asserts against.
///
/// The three reads happen back to back but without any atomicity guarantee;
/// only the pre/post deltas matter for assertions. The captured block hash
/// pins the L2 history at capture time so a later [`Self::check_no_reorg`]
/// can detect a same-height replacement block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainSnapshot {
    /// The observed account.
    pub account: Address,
    /// The account's nonce on the L2 node.
    pub nonce: u64,
    /// The L2 head block number at capture time.
    pub l2_block_number: u64,
    /// The hash of that head block.
    pub l2_block_hash: B256,
    /// The last batch id recorded by the L1 inbox.
    pub l1_batch_id: u64,
}

impl ChainSnapshot {
    /// Captures a snapshot from the live nodes.
    pub async fn capture(
        account: Address,
        l2: &DynProvider,
        l1: &DynProvider,
        inbox_address: Address,
    ) -> Result<Self, HarnessError> {
        let nonce = l2.get_transaction_count(account).await?;
        let l2_block_number = l2.get_block_number().await?;
        let block = l2
            .get_block_by_number(BlockNumberOrTag::Number(l2_block_number))
            .await?
            .ok_or(HarnessError::MissingBlock(l2_block_number))?;
        let l1_batch_id = last_batch_id(l1, inbox_address).await?;

        let snapshot = Self {
            account,
            nonce,
            l2_block_number,
            l2_block_hash: block.header.hash,
            l1_batch_id,
        };
        tracing::info!(
            target: "preconf::harness",
            nonce,
            l2_block_number,
            l1_batch_id,
            block_hash = %snapshot.l2_block_hash,
            "captured chain snapshot"
        );
        Ok(snapshot)
    }

    /// Re-reads the block hash at the captured height and compares it to
    /// the stored one.
    ///
    /// Returns `false` when the hash differs or the chain regressed below
    /// the captured height, both of which mean the node reorganized away a
    /// block earlier assertions depended on.
    pub async fn check_no_reorg(&self, l2: &DynProvider) -> Result<bool, HarnessError> {
        let latest = l2.get_block_number().await?;
        if latest < self.l2_block_number {
            tracing::error!(
                target: "preconf::harness",
                captured = self.l2_block_number,
                latest,
                "chain regressed below the captured height"
            );
            return Ok(false);
        }
        let block = l2.get_block_by_number(BlockNumberOrTag::Number(self.l2_block_number)).await?;
        let Some(block) = block else {
            return Ok(false);
        };
        if block.header.hash != self.l2_block_hash {
            tracing::error!(
                target: "preconf::harness",
                block_number = self.l2_block_number,
                captured_hash = %self.l2_block_hash,
                current_hash = %block.header.hash,
                "reorg detected"
            );
            return Ok(false);
        }
        Ok(true)
    }

    /// L2 blocks produced since the earlier snapshot.
    pub const fn blocks_since(&self, earlier: &Self) -> u64 {
        self.l2_block_number.saturating_sub(earlier.l2_block_number)
    }

    /// Nonce increase of the observed account since the earlier snapshot.
    pub const fn nonce_delta(&self, earlier: &Self) -> u64 {
        self.nonce.saturating_sub(earlier.nonce)
    }

    /// Batches proposed to L1 since the earlier snapshot.
    pub const fn batches_since(&self, earlier: &Self) -> u64 {
        self.l1_batch_id.saturating_sub(earlier.l1_batch_id)
    }
}
