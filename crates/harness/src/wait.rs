//! Bounded waiters over monotonically advancing chain signals.
//!
//! All waiters poll a live signal on the calling task; they differ in
//! whether a timeout is a soft signal (return `false`) or a hard failure
//! (error), chosen per operation.

use crate::{
    spammer::{spam_transactions, InclusionPolicy},
    HarnessError,
};
use alloy_primitives::Address;
use alloy_provider::{DynProvider, Provider};
use alloy_signer_local::PrivateKeySigner;
use preconf_clock::BeaconClock;
use preconf_contracts::{
    last_batch_id, last_batch_proposed_since, operator_state, wait_for_batch_proposed,
    ProposedBatch, BATCH_PROPOSED_TIMEOUT,
};
use std::time::Duration;

/// Default deadline for [`wait_for_new_block`].
pub const NEW_BLOCK_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound, in epochs, of the operator-switch waiter.
pub const OPERATOR_SWITCH_EPOCH_BOUND: u64 = 10;

/// L1 slots [`spam_until_new_batch_proposed`] drives block production for
/// before falling back to the blocking batch waiter.
pub const BATCH_SPAM_SLOTS: u64 = 10;

/// Polls once per second until the node's head advances past `baseline`.
///
/// Soft timeout: logs and returns `false`, leaving the caller to decide
/// whether the absence of a new block is a failure.
pub async fn wait_for_new_block(
    l2: &DynProvider,
    baseline: u64,
    timeout: Duration,
) -> Result<bool, HarnessError> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if l2.get_block_number().await? > baseline {
            return Ok(true);
        }
        if tokio::time::Instant::now() >= deadline {
            tracing::warn!(
                target: "preconf::harness",
                baseline,
                timeout_secs = timeout.as_secs(),
                "block number did not advance before timeout"
            );
            return Ok(false);
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}

/// Blocks until the current epoch designates a different operator for the
/// next epoch (an operator switch epoch) and the slot-in-epoch has reached
/// `min_slot_in_epoch`.
///
/// Advances one epoch per iteration and gives up with
/// [`HarnessError::OperatorSwitchTimeout`] after
/// [`OPERATOR_SWITCH_EPOCH_BOUND`] epochs without a switch.
pub async fn wait_for_epoch_with_operator_switch_and_slot(
    clock: &BeaconClock,
    l1: &DynProvider,
    whitelist_address: Address,
    min_slot_in_epoch: u64,
) -> Result<(), HarnessError> {
    for epoch in 0..OPERATOR_SWITCH_EPOCH_BOUND {
        let state = operator_state(l1, whitelist_address).await?;
        let position = clock.slot_position().await?;
        if state.is_switch_epoch() && position.slot_in_epoch >= min_slot_in_epoch {
            tracing::info!(
                target: "preconf::harness",
                current = %state.current,
                next = %state.next,
                slot_in_epoch = position.slot_in_epoch,
                "operator switch epoch reached"
            );
            return Ok(());
        }
        tracing::info!(
            target: "preconf::harness",
            epoch,
            slot_in_epoch = position.slot_in_epoch,
            switch = state.is_switch_epoch(),
            "not an eligible epoch yet"
        );
        // Lands at `min_slot_in_epoch` of this epoch when still ahead of
        // it, otherwise of the next epoch.
        clock.wait_for_slot_beginning(min_slot_in_epoch).await;
    }
    Err(HarnessError::OperatorSwitchTimeout { epochs: OPERATOR_SWITCH_EPOCH_BOUND })
}

/// Drives L2 block production one block at a time, advancing one L1 slot
/// between attempts, until the inbox emits a batch newer than the current
/// one.
///
/// Models the real latency between L2 block production and L1 batch
/// settlement without an unbounded wait: after [`BATCH_SPAM_SLOTS`] slots
/// the blocking batch waiter takes over and its timeout is fatal.
pub async fn spam_until_new_batch_proposed(
    clock: &BeaconClock,
    l1: &DynProvider,
    l2: &DynProvider,
    signer: &PrivateKeySigner,
    inbox_address: Address,
    min_txs_per_block: u64,
) -> Result<ProposedBatch, HarnessError> {
    let from_block = l1.get_block_number().await?;
    let baseline_batch = last_batch_id(l1, inbox_address).await?;

    for slot in 0..BATCH_SPAM_SLOTS {
        spam_transactions(
            l2,
            signer,
            min_txs_per_block,
            Duration::ZERO,
            InclusionPolicy::WaitOnlyLast,
        )
        .await?;
        tokio::time::sleep(clock.spec().slot_duration()).await;

        if let Some(batch) = last_batch_proposed_since(l1, inbox_address, from_block).await? {
            if batch.batch_id > baseline_batch {
                return Ok(batch);
            }
        }
        tracing::debug!(target: "preconf::harness", slot, "no new batch yet");
    }

    let batch = wait_for_batch_proposed(
        l1,
        inbox_address,
        from_block,
        baseline_batch,
        BATCH_PROPOSED_TIMEOUT,
    )
    .await?;
    Ok(batch)
}
