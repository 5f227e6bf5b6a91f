//! Drives transactions through an L2 node at a controlled pace.

use crate::HarnessError;
use alloy_eips::eip2718::Encodable2718;
use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::{address, Address, B256, U256};
use alloy_provider::{DynProvider, Provider};
use alloy_rpc_types_eth::{BlockNumberOrTag, TransactionRequest};
use alloy_signer_local::PrivateKeySigner;
use std::time::Duration;

/// Sink address of the value transfers.
pub const TRANSFER_SINK: Address = address!("0000000000000000000000000000000000000001");

/// Gas limit of a spammed transfer.
pub const TRANSFER_GAS_LIMIT: u64 = 40_000;

/// Value carried by each spammed transfer, in wei.
pub const TRANSFER_AMOUNT_WEI: u64 = 50_000_000_000_000;

/// Floor applied to the node-reported base fee. Nodes briefly report a
/// degenerate near-zero base fee after restarts.
pub const MIN_BASE_FEE_WEI: u128 = 25_000_000;

/// Default deadline for a single inclusion wait.
pub const TX_INCLUSION_TIMEOUT: Duration = Duration::from_secs(10);

/// Inclusion-wait policy of [`spam_transactions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InclusionPolicy {
    /// Block for inclusion after every send; exercises per-transaction
    /// confirmation.
    WaitEach,
    /// Fire-and-forget all but the final send, then wait on the last;
    /// exercises batch-level throughput.
    WaitOnlyLast,
    /// Fire all, wait on none; the caller decides later.
    WaitNone,
}

/// Computes the fee cap from the node-reported base fee and priority fee,
/// flooring the base fee at [`MIN_BASE_FEE_WEI`].
pub(crate) const fn max_fee_per_gas(base_fee: u128, priority_fee: u128) -> u128 {
    let base_fee = if base_fee < MIN_BASE_FEE_WEI { MIN_BASE_FEE_WEI } else { base_fee };
    base_fee * 2 + priority_fee
}

/// Builds, signs, and submits one EIP-1559 value transfer to
/// [`TRANSFER_SINK`] at the given nonce.
///
/// Submission failures are not retried; that is the caller's decision.
pub async fn send_transfer(
    l2: &DynProvider,
    wallet: &EthereumWallet,
    chain_id: u64,
    nonce: u64,
    amount_wei: U256,
) -> Result<B256, HarnessError> {
    let latest = l2
        .get_block_by_number(BlockNumberOrTag::Latest)
        .await?
        .ok_or(HarnessError::MissingBlock(0))?;
    let base_fee = latest.header.base_fee_per_gas.unwrap_or_default() as u128;
    let priority_fee = l2.get_max_priority_fee_per_gas().await?;

    let tx = TransactionRequest::default()
        .with_chain_id(chain_id)
        .with_nonce(nonce)
        .with_to(TRANSFER_SINK)
        .with_value(amount_wei)
        .with_gas_limit(TRANSFER_GAS_LIMIT)
        .with_max_priority_fee_per_gas(priority_fee)
        .with_max_fee_per_gas(max_fee_per_gas(base_fee, priority_fee));

    let envelope = tx.build(wallet).await?;
    let pending = l2.send_raw_transaction(&envelope.encoded_2718()).await?;
    let hash = *pending.tx_hash();
    tracing::debug!(target: "preconf::harness", %hash, nonce, "sent transfer");
    Ok(hash)
}

/// Sends `count` transfers at strictly increasing nonces starting from the
/// signer's current on-chain nonce, pausing `delay` between sends and
/// waiting for inclusion per `policy`.
///
/// Returns the hashes of all submitted transactions in send order.
pub async fn spam_transactions(
    l2: &DynProvider,
    signer: &PrivateKeySigner,
    count: u64,
    delay: Duration,
    policy: InclusionPolicy,
) -> Result<Vec<B256>, HarnessError> {
    let wallet = EthereumWallet::from(signer.clone());
    let chain_id = l2.get_chain_id().await?;
    let start_nonce = l2.get_transaction_count(signer.address()).await?;

    tracing::info!(
        target: "preconf::harness",
        count,
        start_nonce,
        ?policy,
        "spamming transfers"
    );

    let mut hashes = Vec::with_capacity(count as usize);
    for i in 0..count {
        let hash =
            send_transfer(l2, &wallet, chain_id, start_nonce + i, U256::from(TRANSFER_AMOUNT_WEI))
                .await?;
        hashes.push(hash);

        let is_last = i + 1 == count;
        let wait = match policy {
            InclusionPolicy::WaitEach => true,
            InclusionPolicy::WaitOnlyLast => is_last,
            InclusionPolicy::WaitNone => false,
        };
        if wait && !wait_for_tx_included(l2, hash, TX_INCLUSION_TIMEOUT).await? {
            return Err(HarnessError::TxNotIncluded(hash));
        }
        if !is_last && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
    Ok(hashes)
}

/// Polls once per second for the transaction's receipt.
///
/// Returns `true` only when the mined receipt reports success; a reverted
/// transaction is present on-chain but still reported as not included.
/// Timeout is a soft signal: logs and returns `false`.
pub async fn wait_for_tx_included(
    l2: &DynProvider,
    hash: B256,
    timeout: Duration,
) -> Result<bool, HarnessError> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if let Some(receipt) = l2.get_transaction_receipt(hash).await? {
            return Ok(receipt.status());
        }
        if tokio::time::Instant::now() >= deadline {
            tracing::warn!(
                target: "preconf::harness",
                %hash,
                timeout_secs = timeout.as_secs(),
                "no receipt before timeout"
            );
            return Ok(false);
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}
