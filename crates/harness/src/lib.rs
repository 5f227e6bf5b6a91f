//! End-to-end test harness for a preconfirmation rollup devnet.
//!
//! Pure orchestration glue: RPC polling, container lifecycle, timed waits
//! keyed to the L1 consensus clock, and chain-state snapshots for the
//! scenarios' delta assertions. The rollup node, the contracts, and the
//! forced inclusion toolbox are external systems accessed through their
//! public interfaces.

pub use config::{connect, HarnessConfig};
mod config;

pub use containers::NodeContainer;
mod containers;

pub use error::HarnessError;
mod error;

pub use snapshot::ChainSnapshot;
mod snapshot;

pub use spammer::{
    send_transfer, spam_transactions, wait_for_tx_included, InclusionPolicy, MIN_BASE_FEE_WEI,
    TRANSFER_AMOUNT_WEI, TRANSFER_GAS_LIMIT, TRANSFER_SINK, TX_INCLUSION_TIMEOUT,
};
mod spammer;

pub use toolbox::{send_forced_inclusion, TOOLBOX_IMAGE};
mod toolbox;

pub use wait::{
    spam_until_new_batch_proposed, wait_for_epoch_with_operator_switch_and_slot,
    wait_for_new_block, BATCH_SPAM_SLOTS, NEW_BLOCK_TIMEOUT, OPERATOR_SWITCH_EPOCH_BOUND,
};
mod wait;
