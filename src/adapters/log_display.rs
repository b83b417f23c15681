//! Console display adapter.
//!
//! Stands in for the renderer on host builds: every `every`-th frame is
//! written to the log as the indicator offset plus the numeric readout.

use core::fmt::Write as _;

use log::{debug, info, warn};

use crate::app::ports::{DisplayPort, Frame};
use crate::sensors::Readout;

/// Capacity of one formatted readout line.
pub const READOUT_CAPACITY: usize = 32;

/// Format the two-decimal numeric readout, e.g. `X: 0.12  Y: -0.03`.
///
/// Values too large for the line buffer are truncated rather than failing.
pub fn format_readout(readout: Readout) -> heapless::String<READOUT_CAPACITY> {
    let mut line = heapless::String::new();
    if write!(line, "X: {:.2}  Y: {:.2}", readout.x, readout.y).is_err() {
        warn!("Readout exceeds {} chars, truncated", READOUT_CAPACITY);
    }
    line
}

pub struct LogDisplay {
    every: u32,
    presented: u32,
    last: Option<Frame>,
}

impl LogDisplay {
    /// Log one frame in `every` (clamped to at least 1).
    pub fn new(every: u32) -> Self {
        Self {
            every: every.max(1),
            presented: 0,
            last: None,
        }
    }

    pub fn presented(&self) -> u32 {
        self.presented
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.last
    }
}

impl DisplayPort for LogDisplay {
    fn present(&mut self, frame: &Frame) {
        self.presented = self.presented.wrapping_add(1);

        let alignment_flipped = self.last.is_some_and(|prev| prev.aligned != frame.aligned);
        self.last = Some(*frame);

        if alignment_flipped {
            info!(
                "FRAME | {} | {}",
                format_readout(frame.readout),
                if frame.aligned { "LEVEL" } else { "-" }
            );
        } else if self.presented % self.every == 0 {
            debug!(
                "FRAME | bubble=({:+.1}, {:+.1}) {} | {}",
                frame.offset.x,
                frame.offset.y,
                frame.color.name(),
                format_readout(frame.readout),
            );
        }
    }
}
