//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured session events to the
//! `log` facade (console on host, serial on device).  An analytics or UI
//! status adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::LevelEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`LevelEvent`] as a one-line tagged record.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &LevelEvent) {
        match event {
            LevelEvent::Started { interval_ms } => {
                info!("START | sampling every {}ms", interval_ms);
            }
            LevelEvent::Stopped { accepted, dropped } => {
                info!("STOP  | samples={} dropped={}", accepted, dropped);
            }
            LevelEvent::SensorUnavailable(e) => {
                warn!("SENSR | unavailable ({})", e);
            }
            LevelEvent::SampleDropped { total } => {
                warn!("DROP  | malformed sample, total={}", total);
            }
            LevelEvent::AlignmentChanged { aligned } => {
                info!("LEVEL | {}", if *aligned { "aligned" } else { "off level" });
            }
            LevelEvent::ColorChanged(color) => {
                info!("THEME | indicator={}", color.name());
            }
        }
    }
}
