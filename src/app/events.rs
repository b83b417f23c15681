//! Outbound session events.
//!
//! The [`Session`](super::session::Session) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them: log to the console, feed an analytics
//! pipeline, drive a status line in the UI.

use crate::config::IndicatorColor;
use crate::error::SensorError;

/// Structured events emitted by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEvent {
    /// The sensor subscription opened.
    Started { interval_ms: u32 },

    /// The session ended; carries the run's sample counters.
    Stopped { accepted: u32, dropped: u32 },

    /// The sensor refused the subscription.  Emitted once per failed start.
    SensorUnavailable(SensorError),

    /// A sample with a non-finite component was discarded.
    SampleDropped { total: u32 },

    /// The level / off-level classification flipped.
    AlignmentChanged { aligned: bool },

    /// The indicator theme changed while the session kept running.
    ColorChanged(IndicatorColor),
}
