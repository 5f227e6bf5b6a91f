//! Harness configuration.
//!
//! One explicit struct, constructed once at process start and passed by
//! reference to every component. Every setting is sourced from the
//! environment (or CLI flags) through clap; a missing required setting is a
//! fatal startup error.

use crate::HarnessError;
use alloy_primitives::Address;
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use clap::Parser;
use preconf_contracts::StoreAbi;

/// Settings for a harness session against one devnet.
#[derive(Debug, Clone, Parser)]
#[command(name = "preconf-harness", about = "Preconfirmation rollup e2e harness")]
pub struct HarnessConfig {
    /// L1 execution JSON-RPC endpoint.
    #[arg(long, env = "L1_RPC_URL")]
    pub l1_rpc_url: String,
    /// JSON-RPC endpoint of the first L2 node under test.
    #[arg(long, env = "L2_RPC_URL_NODE1")]
    pub l2_rpc_url_node1: String,
    /// JSON-RPC endpoint of the second L2 node under test.
    #[arg(long, env = "L2_RPC_URL_NODE2")]
    pub l2_rpc_url_node2: String,
    /// Beacon chain REST endpoint.
    #[arg(long, env = "BEACON_RPC_URL")]
    pub beacon_rpc_url: String,
    /// Address of the inbox contract on L1.
    #[arg(long, env = "INBOX_ADDRESS")]
    pub inbox_address: Address,
    /// Address of the preconf whitelist contract on L1.
    #[arg(long, env = "PRECONF_WHITELIST_ADDRESS")]
    pub whitelist_address: Address,
    /// Address of the forced inclusion store contract on L1.
    #[arg(long, env = "FORCED_INCLUSION_STORE_ADDRESS")]
    pub forced_inclusion_store_address: Address,
    /// Read the forced inclusion store through the legacy `head()`/`tail()`
    /// ABI instead of `getForcedInclusionState()`.
    #[arg(long, env = "LEGACY_FORCED_INCLUSION_ABI", default_value_t = false)]
    pub legacy_forced_inclusion_abi: bool,
    /// Prefunded L2 account used by the transaction spammer.
    #[arg(long, env = "TEST_L2_PREFUNDED_PRIVATE_KEY")]
    pub prefunded_private_key: String,
    /// L2 account whose nonce tracks forced inclusion submissions. Must
    /// differ from the prefunded key.
    #[arg(long, env = "L2_PRIVATE_KEY")]
    pub forced_inclusion_private_key: String,
    /// Maximum number of L2 blocks the node packs into one batch.
    #[arg(long, env = "MAX_BLOCKS_PER_BATCH")]
    pub max_blocks_per_batch: u64,
    /// Preconfirmation heartbeat interval in milliseconds.
    #[arg(long, env = "PRECONF_HEARTBEAT_MS")]
    pub preconf_heartbeat_ms: u64,
    /// Docker container name of the first node.
    #[arg(long, env = "CONTAINER_NAME_NODE1")]
    pub container_name_node1: String,
    /// Docker container name of the second node.
    #[arg(long, env = "CONTAINER_NAME_NODE2")]
    pub container_name_node2: String,
}

impl HarnessConfig {
    /// Builds the configuration from the environment alone.
    pub fn from_env() -> Result<Self, HarnessError> {
        let config = Self::try_parse_from(std::iter::once("preconf-harness"))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.prefunded_private_key == self.forced_inclusion_private_key {
            return Err(HarnessError::InvalidConfig(
                "forced inclusion key must differ from the prefunded key".into(),
            ));
        }
        Ok(())
    }

    /// The ABI generation to read the forced inclusion store through.
    pub const fn store_abi(&self) -> StoreAbi {
        if self.legacy_forced_inclusion_abi {
            StoreAbi::Legacy
        } else {
            StoreAbi::Current
        }
    }

    /// Connects to the L1 execution endpoint.
    pub async fn l1_provider(&self) -> Result<DynProvider, HarnessError> {
        connect(&self.l1_rpc_url).await
    }

    /// Connects to the first L2 node.
    pub async fn l2_provider_node1(&self) -> Result<DynProvider, HarnessError> {
        connect(&self.l2_rpc_url_node1).await
    }

    /// Connects to the second L2 node.
    pub async fn l2_provider_node2(&self) -> Result<DynProvider, HarnessError> {
        connect(&self.l2_rpc_url_node2).await
    }

    /// The spammer's signer.
    pub fn prefunded_signer(&self) -> Result<PrivateKeySigner, HarnessError> {
        Ok(self.prefunded_private_key.parse()?)
    }

    /// The forced inclusion sender's signer, used only to derive the
    /// account whose nonce the scenarios observe.
    pub fn forced_inclusion_signer(&self) -> Result<PrivateKeySigner, HarnessError> {
        Ok(self.forced_inclusion_private_key.parse()?)
    }
}

/// Connects an HTTP provider to the given JSON-RPC endpoint.
pub async fn connect(url: &str) -> Result<DynProvider, HarnessError> {
    Ok(ProviderBuilder::new().connect(url).await?.erased())
}
