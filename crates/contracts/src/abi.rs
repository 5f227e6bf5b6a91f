//! Solidity interfaces of the L1 contracts the harness reads.

use alloy_sol_types::sol;

/// The rollup inbox: batch statistics and the `BatchProposed` event.
pub mod inbox {
    use super::*;

    sol! {
        /// Aggregate batch counters kept by the inbox.
        struct Stats2 {
            uint64 numBatches;
            uint64 lastVerifiedBatchId;
            bool paused;
            uint56 lastProposedIn;
            uint64 lastUnpausedAt;
        }

        function getStats2() external view returns (Stats2 memory);

        /// Summary of the L2 blocks covered by a proposed batch.
        struct BatchInfo {
            uint64 lastBlockId;
            uint64 lastBlockTimestamp;
        }

        /// Metadata of a proposed batch.
        struct BatchMeta {
            uint64 batchId;
            address proposer;
            uint64 proposedAt;
        }

        event BatchProposed(BatchInfo info, BatchMeta meta, bytes txList);
    }
}

/// The preconfirmation operator whitelist.
pub mod whitelist {
    use super::*;

    sol! {
        function getOperatorForCurrentEpoch() external view returns (address);
        function getOperatorForNextEpoch() external view returns (address);
    }
}

/// The forced inclusion store, in both ABI generations.
pub mod forced_inclusion_store {
    use super::*;

    sol! {
        // Legacy deployments expose the two ring-buffer cursors directly.
        function head() external view returns (uint64);
        function tail() external view returns (uint64);

        // Newer deployments bundle them with the last processing timestamp.
        function getForcedInclusionState()
            external
            view
            returns (uint64 head, uint64 tail, uint64 lastProcessedAt);
    }
}
