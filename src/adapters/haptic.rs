//! Haptic adapter: logs and counts vibration pulses.
//!
//! Host stand-in for the vibration motor.  The pulse counter is shared so
//! the owner can read it after the session (which holds the adapter) is
//! gone.

use core::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use log::info;

use crate::app::ports::HapticPort;

#[derive(Debug, Clone, Default)]
pub struct LogHaptic {
    pulses: Arc<AtomicU32>,
}

impl LogHaptic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared pulse counter.
    pub fn counter(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.pulses)
    }

    pub fn pulses(&self) -> u32 {
        self.pulses.load(Ordering::Relaxed)
    }
}

impl HapticPort for LogHaptic {
    fn pulse(&mut self) {
        let n = self.pulses.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        info!("BUZZ  | level reached (pulse #{})", n);
    }
}
