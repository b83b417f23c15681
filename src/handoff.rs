//! Single-slot target mailbox between the sensor and render domains.
//!
//! ```text
//!  ┌───────────────┐  publish (overwrite)  ┌────────────┐  take  ┌───────────────┐
//!  │ sample handler│──────────────────────▶│ TargetSlot │───────▶│  render tick  │
//!  │ (sensor thread)│                      │  (1 value) │        │ (frame clock) │
//!  └───────────────┘                       └────────────┘        └───────────────┘
//! ```
//!
//! Built on `embassy-sync`'s [`Signal`]: a newer publish replaces an unread
//! one, a take empties the slot, and neither side ever waits on the other.
//! Only the freshest target matters; intermediate samples that the render
//! tick never saw are simply superseded.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::geometry::Offset;
use crate::sensors::Readout;

/// Everything the render domain needs from the latest accepted sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetUpdate {
    pub target: Offset,
    pub readout: Readout,
    pub aligned: bool,
}

pub struct TargetSlot {
    signal: Signal<CriticalSectionRawMutex, TargetUpdate>,
}

impl Default for TargetSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetSlot {
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
        }
    }

    /// Store `update`, replacing any value the render side has not taken.
    pub fn publish(&self, update: TargetUpdate) {
        self.signal.signal(update);
    }

    /// Take the pending update, if any.  Never blocks.
    pub fn take(&self) -> Option<TargetUpdate> {
        self.signal.try_take()
    }

    /// Discard any pending update (session stop / restart).
    pub fn clear(&self) {
        self.signal.reset();
    }
}
