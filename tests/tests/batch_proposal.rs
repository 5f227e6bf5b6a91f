//! Batch settlement scenarios: L2 blocks spammed at the preconfirmation
//! heartbeat must settle on L1 as inbox batches, including right after a
//! restart of both nodes.

use preconf_contracts::last_batch_id;
use preconf_harness::{
    spam_transactions, spam_until_new_batch_proposed, ChainSnapshot, InclusionPolicy,
};
use tests::TestContext;

#[tokio::test]
#[ignore = "requires a running preconfirmation devnet"]
async fn spamming_blocks_triggers_a_new_batch() -> eyre::Result<()> {
    let ctx = TestContext::new().await?;
    let signer = ctx.config.prefunded_signer()?;

    let baseline = last_batch_id(&ctx.l1, ctx.config.inbox_address).await?;
    let batch = spam_until_new_batch_proposed(
        &ctx.clock,
        &ctx.l1,
        &ctx.l2_node1,
        &signer,
        ctx.config.inbox_address,
        1,
    )
    .await?;

    assert!(batch.batch_id > baseline, "proposed batch {} is not newer", batch.batch_id);
    assert!(batch.last_block_id > 0);
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running preconfirmation devnet"]
async fn restarted_nodes_settle_three_full_batches() -> eyre::Result<()> {
    let ctx = TestContext::new().await?;
    let signer = ctx.config.prefunded_signer()?;
    let spec = *ctx.clock.spec();
    let blocks_per_batch = ctx.config.max_blocks_per_batch;

    // Align to slot 1 so the whole scenario runs inside one epoch segment
    // and the restart does not straddle a handover.
    ctx.clock.wait_for_slot_beginning(1).await;
    ctx.node1_container().restart()?;
    ctx.node2_container().restart()?;
    tokio::time::sleep(3 * spec.slot_duration()).await;

    let result = async {
        let before = ChainSnapshot::capture(
            signer.address(),
            &ctx.l2_node1,
            &ctx.l1,
            ctx.config.inbox_address,
        )
        .await?;

        // One transfer per L2 block, enough blocks for exactly three
        // batches.
        spam_transactions(
            &ctx.l2_node1,
            &signer,
            3 * blocks_per_batch,
            ctx.heartbeat_delay(),
            InclusionPolicy::WaitNone,
        )
        .await?;
        tokio::time::sleep(3 * spec.slot_duration()).await;

        let after = ChainSnapshot::capture(
            signer.address(),
            &ctx.l2_node1,
            &ctx.l1,
            ctx.config.inbox_address,
        )
        .await?;

        assert_eq!(
            after.blocks_since(&before),
            3 * blocks_per_batch,
            "each transfer should have minted exactly one block"
        );
        assert_eq!(after.batches_since(&before), 3, "expected three settled batches");
        assert!(
            before.check_no_reorg(&ctx.l2_node1).await?,
            "restart reorganized previously confirmed blocks"
        );
        eyre::Ok(())
    }
    .await;

    ctx.ensure_nodes_running()?;
    result
}
