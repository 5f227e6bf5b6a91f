/// An error that occurred while interacting with the beacon consensus clock.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// The beacon API did not respond or returned a malformed body.
    #[error("beacon api unavailable: {0}")]
    UnavailableBeaconApi(#[from] reqwest::Error),
    /// The beacon spec contains values the clock cannot work with.
    #[error("invalid beacon spec: slots_per_epoch = {slots_per_epoch}, seconds_per_slot = {seconds_per_slot}")]
    InvalidSpec {
        /// The reported number of slots per epoch.
        slots_per_epoch: u64,
        /// The reported slot duration in seconds.
        seconds_per_slot: u64,
    },
}
