//! Operator handover scenarios: transfers must keep landing while the
//! active sequencer hands over to the next operator, without reorgs.

use alloy_network::EthereumWallet;
use alloy_primitives::U256;
use preconf_clock::HANDOVER_WINDOW_SLOTS;
use preconf_contracts::operator_state;
use preconf_harness::{
    send_transfer, spam_transactions, wait_for_epoch_with_operator_switch_and_slot,
    wait_for_tx_included, ChainSnapshot, InclusionPolicy, TRANSFER_AMOUNT_WEI,
    TX_INCLUSION_TIMEOUT,
};
use std::time::Duration;
use tests::TestContext;

use alloy_provider::Provider;

#[tokio::test]
#[ignore = "requires a running preconfirmation devnet"]
async fn transfers_land_on_both_nodes_inside_handover_window() -> eyre::Result<()> {
    let ctx = TestContext::new().await?;
    let signer = ctx.config.prefunded_signer()?;
    let wallet = EthereumWallet::from(signer.clone());

    ctx.clock.wait_for_handover_window().await;

    let chain_id = ctx.l2_node1.get_chain_id().await?;
    let nonce = ctx.l2_node1.get_transaction_count(signer.address()).await?;
    let amount = U256::from(TRANSFER_AMOUNT_WEI);

    // One transfer through each node at consecutive nonces. Both must be
    // included even though the window may flip the active sequencer
    // between the two sends.
    let hash = send_transfer(&ctx.l2_node1, &wallet, chain_id, nonce, amount).await?;
    assert!(
        wait_for_tx_included(&ctx.l2_node1, hash, TX_INCLUSION_TIMEOUT).await?,
        "transfer via node1 not included inside the handover window"
    );

    let hash = send_transfer(&ctx.l2_node2, &wallet, chain_id, nonce + 1, amount).await?;
    assert!(
        wait_for_tx_included(&ctx.l2_node2, hash, TX_INCLUSION_TIMEOUT).await?,
        "transfer via node2 not included inside the handover window"
    );
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running preconfirmation devnet"]
async fn operator_switch_epoch_does_not_reorg() -> eyre::Result<()> {
    let ctx = TestContext::new().await?;
    let signer = ctx.config.prefunded_signer()?;
    let spec = *ctx.clock.spec();

    let before =
        ChainSnapshot::capture(signer.address(), &ctx.l2_node1, &ctx.l1, ctx.config.inbox_address)
            .await?;

    // Park at the start of the handover window of an epoch whose operator
    // actually changes next epoch.
    let window_start = spec.slots_per_epoch - HANDOVER_WINDOW_SLOTS;
    wait_for_epoch_with_operator_switch_and_slot(
        &ctx.clock,
        &ctx.l1,
        ctx.config.whitelist_address,
        window_start,
    )
    .await?;

    let state = operator_state(&ctx.l1, ctx.config.whitelist_address).await?;
    assert!(state.is_switch_epoch(), "waiter returned outside a switch epoch");

    // Cross the epoch boundary so the next operator takes over, then keep
    // producing blocks under the new operator.
    ctx.clock.wait_for_slot_beginning(1).await;
    spam_transactions(&ctx.l2_node1, &signer, 2, Duration::ZERO, InclusionPolicy::WaitEach)
        .await?;

    assert!(
        before.check_no_reorg(&ctx.l2_node1).await?,
        "operator switch reorganized blocks confirmed before the handover"
    );
    Ok(())
}
