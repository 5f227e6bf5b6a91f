//! Forced inclusion scenarios: transactions pushed through the forced
//! inclusion store must land on L2, settle as their own batches, and drain
//! the store durably.

use preconf_contracts::forced_inclusion_state;
use preconf_harness::{
    send_forced_inclusion, spam_transactions, wait_for_tx_included, ChainSnapshot,
    InclusionPolicy, TX_INCLUSION_TIMEOUT,
};
use tests::TestContext;

use alloy_provider::Provider;

/// Forced inclusions are only picked up near the end of an epoch, so the
/// scenarios park two slots before the epoch boundary first.
fn pickup_slot(slots_per_epoch: u64) -> u64 {
    slots_per_epoch.saturating_sub(2)
}

#[tokio::test]
#[ignore = "requires a running preconfirmation devnet"]
async fn forced_inclusion_tx_reaches_l2() -> eyre::Result<()> {
    let ctx = TestContext::new().await?;
    let signer = ctx.config.prefunded_signer()?;
    let spec = *ctx.clock.spec();

    ctx.clock.wait_for_slot_beginning(pickup_slot(spec.slots_per_epoch)).await;
    let hash = send_forced_inclusion(0)?;

    // The store is only drained when batches are being proposed, so keep
    // block production going while waiting for the forced transaction.
    spam_transactions(
        &ctx.l2_node1,
        &signer,
        4 * ctx.config.max_blocks_per_batch + 1,
        ctx.heartbeat_delay(),
        InclusionPolicy::WaitNone,
    )
    .await?;

    assert!(
        wait_for_tx_included(&ctx.l2_node1, hash, 4 * TX_INCLUSION_TIMEOUT).await?,
        "forced inclusion transaction {hash} never reached L2"
    );
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running preconfirmation devnet"]
async fn three_consecutive_forced_inclusions_settle() -> eyre::Result<()> {
    let ctx = TestContext::new().await?;
    let signer = ctx.config.prefunded_signer()?;
    let forced_account = ctx.config.forced_inclusion_signer()?.address();
    let spec = *ctx.clock.spec();
    let blocks_per_batch = ctx.config.max_blocks_per_batch;

    ctx.clock.wait_for_slot_beginning(pickup_slot(spec.slots_per_epoch)).await;
    let before =
        ChainSnapshot::capture(forced_account, &ctx.l2_node1, &ctx.l1, ctx.config.inbox_address)
            .await?;

    // Queue three forced transactions at consecutive nonces. The store
    // processes at most one per proposed batch.
    for nonce_delta in 0..3 {
        send_forced_inclusion(nonce_delta)?;
    }

    spam_transactions(
        &ctx.l2_node1,
        &signer,
        blocks_per_batch,
        ctx.heartbeat_delay(),
        InclusionPolicy::WaitNone,
    )
    .await?;
    tokio::time::sleep(spec.slot_duration()).await;

    // The first batch after the submissions must carry the first forced
    // transaction.
    let nonce = ctx.l2_node1.get_transaction_count(forced_account).await?;
    assert_eq!(nonce, before.nonce + 1, "first forced inclusion not processed");

    spam_transactions(
        &ctx.l2_node1,
        &signer,
        3 * blocks_per_batch,
        ctx.heartbeat_delay(),
        InclusionPolicy::WaitNone,
    )
    .await?;
    tokio::time::sleep(2 * spec.slot_duration()).await;

    let after =
        ChainSnapshot::capture(forced_account, &ctx.l2_node1, &ctx.l1, ctx.config.inbox_address)
            .await?;

    // Four batches worth of spammed blocks plus one block per forced
    // transaction.
    assert_eq!(after.blocks_since(&before), 4 * blocks_per_batch + 3);
    assert_eq!(after.nonce_delta(&before), 3, "not all forced transactions processed");
    // Each forced inclusion settles as its own batch alongside the four
    // spammed ones.
    assert_eq!(after.batches_since(&before), 7);
    assert!(before.check_no_reorg(&ctx.l2_node1).await?);
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running preconfirmation devnet"]
async fn store_head_advances_and_survives_restart() -> eyre::Result<()> {
    let ctx = TestContext::new().await?;
    let signer = ctx.config.prefunded_signer()?;
    let spec = *ctx.clock.spec();
    let store = ctx.config.forced_inclusion_store_address;
    let abi = ctx.config.store_abi();

    let state = forced_inclusion_state(&ctx.l1, store, abi).await?;
    assert!(state.is_empty(), "store must be drained before the scenario starts");
    let head_before = state.head();

    ctx.clock.wait_for_slot_beginning(pickup_slot(spec.slots_per_epoch)).await;
    send_forced_inclusion(0)?;
    spam_transactions(
        &ctx.l2_node1,
        &signer,
        ctx.config.max_blocks_per_batch + 1,
        ctx.heartbeat_delay(),
        InclusionPolicy::WaitNone,
    )
    .await?;
    tokio::time::sleep(2 * spec.slot_duration()).await;

    let drained = forced_inclusion_state(&ctx.l1, store, abi).await?;
    assert!(drained.head() > head_before, "store head did not advance after draining");
    assert!(drained.is_empty(), "store still holds queued forced inclusions");

    let result = async {
        // Head is contract state on L1, so restarting the L2 node must
        // not move it.
        ctx.node1_container().restart()?;
        tokio::time::sleep(3 * spec.slot_duration()).await;

        let after_restart = forced_inclusion_state(&ctx.l1, store, abi).await?;
        assert_eq!(after_restart.head(), drained.head(), "store head changed across restart");
        assert!(after_restart.head() > 0);
        eyre::Ok(())
    }
    .await;

    ctx.ensure_nodes_running()?;
    result
}
