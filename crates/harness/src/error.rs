use alloy_primitives::B256;
use preconf_clock::ClockError;
use preconf_contracts::ContractError;

/// An error raised by the harness.
///
/// Configuration errors are fatal at startup; collaborator errors propagate
/// as fatal test failures except where a waiter explicitly defines
/// timeout-as-false semantics.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// A required setting is missing or unparsable.
    #[error("configuration error: {0}")]
    Config(#[from] clap::Error),
    /// A setting parsed but violates a cross-field constraint.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A private key could not be parsed into a signer.
    #[error("invalid private key: {0}")]
    Key(#[from] alloy_signer_local::LocalSignerError),
    /// A provider error at the RPC level.
    #[error("rpc transport error: {0}")]
    Rpc(#[from] alloy_transport::TransportError),
    /// The beacon clock failed.
    #[error(transparent)]
    Clock(#[from] ClockError),
    /// A contract query failed.
    #[error(transparent)]
    Contract(#[from] ContractError),
    /// A transaction could not be assembled and signed.
    #[error("failed to build transaction: {0}")]
    TxBuild(#[from] alloy_network::TransactionBuilderError<alloy_network::Ethereum>),
    /// A block expected to exist was not returned by the node.
    #[error("unknown block {0}")]
    MissingBlock(u64),
    /// A transaction the spammer waited on was not included in time.
    #[error("transaction {0} not included")]
    TxNotIncluded(B256),
    /// No operator switch epoch appeared within the bounded wait.
    #[error("no operator switch epoch within {epochs} epochs")]
    OperatorSwitchTimeout {
        /// The number of epochs the waiter covered before giving up.
        epochs: u64,
    },
    /// A docker command against a node container failed.
    #[error("container {name}: {message}")]
    Container {
        /// The container name.
        name: String,
        /// The failing command's stderr.
        message: String,
    },
    /// The forced inclusion toolbox exited non-zero.
    #[error("forced inclusion toolbox failed: {0}")]
    Toolbox(String),
    /// The toolbox output did not contain a transaction hash.
    #[error("no transaction hash in forced inclusion toolbox output")]
    ToolboxOutput,
    /// Spawning a subprocess failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
