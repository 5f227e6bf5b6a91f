//! Beacon consensus clock for the preconfirmation e2e harness.
//!
//! Wraps a beacon node REST API to expose slot and epoch arithmetic, and
//! provides the timed waits the test scenarios use to align themselves to
//! the L1 consensus clock (slot beginnings, the operator handover window).

use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub use error::ClockError;
mod error;

pub use timing::{
    seconds_until_handover_window, seconds_until_slot, SlotOccurrence, SlotPosition,
    HANDOVER_WINDOW_SLOTS,
};
mod timing;

/// The config spec beacon api method.
const SPEC_METHOD: &str = "eth/v1/config/spec";

/// The beacon genesis beacon api method.
const GENESIS_METHOD: &str = "eth/v1/beacon/genesis";

/// The node syncing beacon api method.
const SYNCING_METHOD: &str = "eth/v1/node/syncing";

/// An API response.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
struct ApiResponse<T> {
    /// The data.
    data: T,
}

/// The subset of the beacon chain configuration the clock needs.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
struct ConfigData {
    /// The number of slots per epoch.
    #[serde(rename = "SLOTS_PER_EPOCH")]
    #[serde(with = "alloy_serde::quantity")]
    slots_per_epoch: u64,
    /// The seconds per slot.
    #[serde(rename = "SECONDS_PER_SLOT")]
    #[serde(with = "alloy_serde::quantity")]
    seconds_per_slot: u64,
}

/// A reduced genesis data.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
struct GenesisData {
    /// The genesis time.
    #[serde(rename = "genesis_time")]
    #[serde(with = "alloy_serde::quantity")]
    genesis_time: u64,
}

/// A reduced syncing status.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
struct SyncingData {
    /// The current head slot.
    #[serde(rename = "head_slot")]
    #[serde(with = "alloy_serde::quantity")]
    head_slot: u64,
}

/// The immutable per-session beacon chain parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeaconSpec {
    /// The number of slots per epoch.
    pub slots_per_epoch: u64,
    /// The slot duration in seconds.
    pub seconds_per_slot: u64,
    /// The unix timestamp of the genesis slot.
    pub genesis_time: u64,
}

impl BeaconSpec {
    /// The duration of one slot.
    pub const fn slot_duration(&self) -> Duration {
        Duration::from_secs(self.seconds_per_slot)
    }

    /// The duration of one epoch.
    pub const fn epoch_duration(&self) -> Duration {
        Duration::from_secs(self.seconds_per_slot * self.slots_per_epoch)
    }
}

/// A clock over the L1 consensus layer.
///
/// The beacon spec is fetched once at construction and cached for the
/// session. Slot positions are live properties of the chain and are
/// recomputed on every query.
#[derive(Debug, Clone)]
pub struct BeaconClock {
    /// The base URL of the beacon API.
    base: String,
    /// The inner reqwest client.
    inner: reqwest::Client,
    /// The cached beacon spec.
    spec: BeaconSpec,
}

impl BeaconClock {
    /// Connects to the beacon API at the provided base URL, fetching and
    /// validating the chain spec.
    pub async fn new(base: impl Into<String>) -> Result<Self, ClockError> {
        let mut base = base.into();
        if base.ends_with('/') {
            base.remove(base.len() - 1);
        }
        let inner = reqwest::Client::new();

        let config: ApiResponse<ConfigData> =
            inner.get(format!("{base}/{SPEC_METHOD}")).send().await?.json().await?;
        let genesis: ApiResponse<GenesisData> =
            inner.get(format!("{base}/{GENESIS_METHOD}")).send().await?.json().await?;

        let ConfigData { slots_per_epoch, seconds_per_slot } = config.data;
        if slots_per_epoch == 0 || seconds_per_slot == 0 {
            return Err(ClockError::InvalidSpec { slots_per_epoch, seconds_per_slot });
        }

        let spec =
            BeaconSpec { slots_per_epoch, seconds_per_slot, genesis_time: genesis.data.genesis_time };
        tracing::debug!(target: "preconf::clock", ?spec, "connected to beacon api");
        Ok(Self { base, inner, spec })
    }

    /// Returns the cached beacon spec.
    pub const fn spec(&self) -> &BeaconSpec {
        &self.spec
    }

    /// Returns the current head slot position, queried live from the beacon
    /// node.
    pub async fn slot_position(&self) -> Result<SlotPosition, ClockError> {
        let syncing: ApiResponse<SyncingData> =
            self.inner.get(format!("{}/{SYNCING_METHOD}", self.base)).send().await?.json().await?;
        Ok(SlotPosition::new(syncing.data.head_slot, self.spec.slots_per_epoch))
    }

    /// Returns the current slot-in-epoch.
    pub async fn slot_in_epoch(&self) -> Result<u64, ClockError> {
        Ok(self.slot_position().await?.slot_in_epoch)
    }

    /// Returns the seconds until the start of the requested slot-in-epoch.
    pub fn seconds_until_slot(&self, target_slot_in_epoch: u64, occurrence: SlotOccurrence) -> u64 {
        seconds_until_slot(&self.spec, unix_now(), target_slot_in_epoch, occurrence)
    }

    /// Returns the seconds until the handover window opens, zero when
    /// already inside it.
    pub fn seconds_until_handover_window(&self) -> u64 {
        seconds_until_handover_window(&self.spec, unix_now())
    }

    /// Sleeps until the next occurrence of the target slot-in-epoch has
    /// begun. Never returns immediately: when called inside the target slot
    /// the wait extends to the next epoch.
    pub async fn wait_for_slot_beginning(&self, target_slot_in_epoch: u64) {
        let secs = self.seconds_until_slot(target_slot_in_epoch, SlotOccurrence::Next);
        tracing::info!(
            target: "preconf::clock",
            target_slot_in_epoch,
            secs,
            "waiting for slot beginning"
        );
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }

    /// Sleeps until inside the handover window at the end of the current or
    /// next epoch.
    pub async fn wait_for_handover_window(&self) {
        let secs = self.seconds_until_handover_window();
        tracing::info!(target: "preconf::clock", secs, "waiting for handover window");
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }
}

/// The current unix timestamp in seconds.
fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).expect("system time before unix epoch").as_secs()
}
