/// An error that occurred while querying the L1 contracts.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    /// A provider error at the RPC level.
    #[error("contract rpc error: {0}")]
    Rpc(#[from] alloy_transport::TransportError),
    /// The returned calldata could not be decoded.
    #[error("abi decode error: {0}")]
    Decode(#[from] alloy_sol_types::Error),
    /// No `BatchProposed` event appeared before the waiter's deadline.
    ///
    /// Batch proposal not happening at all is a core correctness failure,
    /// so this waiter is the one that fails hard on timeout.
    #[error("no BatchProposed event since block {from_block} after {waited_secs}s")]
    NoBatchProposed {
        /// The L1 block the event search started from.
        from_block: u64,
        /// How long the waiter polled before giving up.
        waited_secs: u64,
    },
}
