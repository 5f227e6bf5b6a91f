//! Bindings and typed queries for the L1 contracts of the preconfirmation
//! rollup: the batch inbox, the operator whitelist, and the forced inclusion
//! store.
//!
//! All accesses are read-only projections of on-chain state; nothing here
//! submits transactions.

pub mod abi;

pub use error::ContractError;
mod error;

pub use queries::{
    forced_inclusion_state, last_batch_id, operator_state, ForcedInclusionState, OperatorState,
    StoreAbi,
};
mod queries;

pub use events::{
    last_batch_proposed_since, wait_for_batch_proposed, ProposedBatch, BATCH_PROPOSED_TIMEOUT,
};
mod events;
