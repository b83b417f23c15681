//! Port traits — the hexagonal boundary between the level core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Session (domain)
//! ```
//!
//! The sensor driver, the haptic actuator, the display and the event log are
//! all external collaborators.  They implement these traits and the
//! [`Session`](super::session::Session) consumes them, so the core never
//! touches a platform API directly.

use core::time::Duration;

use crate::config::IndicatorColor;
use crate::error::SensorError;
use crate::geometry::Offset;
use crate::sensors::Readout;

pub use super::session::{Delivery, SampleSink};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Push-based tilt source.
///
/// After a successful [`subscribe`](Self::subscribe) the implementation
/// delivers samples to `sink` from whatever thread or callback context it
/// owns, roughly every `interval`.
pub trait SensorPort {
    /// Start delivering samples to `sink`.
    ///
    /// Fails with a [`SensorError`] when the platform denies access or no
    /// sensor is present; the core reports this and does not retry.
    fn subscribe(&mut self, interval: Duration, sink: SampleSink) -> Result<(), SensorError>;

    /// Stop delivering samples.  Must be idempotent, and once it returns
    /// the implementation must not call the sink again.
    fn unsubscribe(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Haptic port (driven adapter: domain → actuator)
// ───────────────────────────────────────────────────────────────

/// Vibration actuator fired when the device becomes level.
pub trait HapticPort {
    fn pulse(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → renderer)
// ───────────────────────────────────────────────────────────────

/// One render-domain snapshot of the indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Smoothed offset of the indicator from the ring's center.
    pub offset: Offset,
    /// Raw x/y tilt for the numeric readout.
    pub readout: Readout,
    /// Latest alignment classification.
    pub aligned: bool,
    pub color: IndicatorColor,
}

impl Frame {
    /// Indicator at rest in the center with a zero readout.
    pub fn centered(color: IndicatorColor) -> Self {
        Self {
            offset: Offset::CENTER,
            readout: Readout::default(),
            aligned: false,
            color,
        }
    }
}

/// Renderer that draws the indicator every frame.
pub trait DisplayPort {
    fn present(&mut self, frame: &Frame);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The session emits structured [`LevelEvent`](super::events::LevelEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::LevelEvent);
}
