//! Slot arithmetic over the L1 consensus clock.
//!
//! All computations are anchored at the beacon genesis timestamp, which lets
//! the wait durations account for the time already elapsed inside the current
//! slot instead of rounding to whole slots.

use crate::BeaconSpec;

/// Number of slots at the end of an epoch forming the operator handover
/// window. The window start is always derived from the live
/// `slots_per_epoch`, never from a fixed slot index.
pub const HANDOVER_WINDOW_SLOTS: u64 = 4;

/// Tie-break policy for [`seconds_until_slot`] when the current slot-in-epoch
/// already equals the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOccurrence {
    /// Wait for the next occurrence of the target slot, a full epoch away.
    Next,
    /// Treat the current slot as satisfying the target and return zero.
    AllowCurrent,
}

/// The position of a slot within its epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPosition {
    /// The absolute slot number.
    pub slot: u64,
    /// The slot number reduced modulo the epoch length.
    pub slot_in_epoch: u64,
}

impl SlotPosition {
    /// Derives the position of the given absolute slot.
    pub const fn new(slot: u64, slots_per_epoch: u64) -> Self {
        Self { slot, slot_in_epoch: slot % slots_per_epoch }
    }
}

/// Returns the seconds until the start of the requested slot-in-epoch,
/// evaluated at `now_unix`.
///
/// The result covers the remainder of the current slot plus all whole slots
/// in between, with one extra second so the target slot has strictly begun
/// when a sleep of this length resumes.
pub fn seconds_until_slot(
    spec: &BeaconSpec,
    now_unix: u64,
    target_slot_in_epoch: u64,
    occurrence: SlotOccurrence,
) -> u64 {
    let target = target_slot_in_epoch % spec.slots_per_epoch;
    let elapsed = now_unix.saturating_sub(spec.genesis_time);
    let slot_in_epoch = (elapsed / spec.seconds_per_slot) % spec.slots_per_epoch;
    let into_slot = elapsed % spec.seconds_per_slot;

    let mut slots_ahead =
        (target + spec.slots_per_epoch - slot_in_epoch) % spec.slots_per_epoch;
    if slots_ahead == 0 {
        match occurrence {
            SlotOccurrence::AllowCurrent => return 0,
            SlotOccurrence::Next => slots_ahead = spec.slots_per_epoch,
        }
    }

    slots_ahead * spec.seconds_per_slot - into_slot + 1
}

/// Returns the seconds until the handover window opens, or zero when
/// `now_unix` already falls inside it.
///
/// The window spans the trailing [`HANDOVER_WINDOW_SLOTS`] slots of every
/// epoch.
pub fn seconds_until_handover_window(spec: &BeaconSpec, now_unix: u64) -> u64 {
    let window_start = spec.slots_per_epoch.saturating_sub(HANDOVER_WINDOW_SLOTS);
    let elapsed = now_unix.saturating_sub(spec.genesis_time);
    let slot_in_epoch = (elapsed / spec.seconds_per_slot) % spec.slots_per_epoch;

    if slot_in_epoch >= window_start {
        return 0;
    }
    seconds_until_slot(spec, now_unix, window_start, SlotOccurrence::AllowCurrent)
}
