//! Sensor adapter: bridges the accelerometer to [`SensorPort`].
//!
//! Owns a [`SimAccelerometer`] and, while subscribed, a worker thread that
//! reads it on a fixed cadence and pushes each sample into the session's
//! [`SampleSink`].  The worker hands the accelerometer back when it is
//! joined, so the adapter can be subscribed again after a stop.
//!
//! ```text
//!  subscribe()                          unsubscribe()
//!     │  check ─ Err ─▶ SensorError         │ stop flag + unpark
//!     ▼                                     ▼
//!  ┌────────────── "tilt-sensor" thread ───────────────┐
//!  │ loop { read → sink.push → park until deadline }   │──▶ join → accel
//!  └───────────────────────────────────────────────────┘
//! ```

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use log::{debug, info, warn};

use crate::app::ports::{Delivery, SampleSink, SensorPort};
use crate::error::SensorError;
use crate::sensors::accelerometer::SimAccelerometer;

/// Floor for the sampling cadence.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

struct Worker {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<SimAccelerometer>,
}

pub struct AccelerometerAdapter {
    idle: Option<SimAccelerometer>,
    worker: Option<Worker>,
}

impl AccelerometerAdapter {
    pub fn new(accel: SimAccelerometer) -> Self {
        Self {
            idle: Some(accel),
            worker: None,
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.worker.is_some()
    }

    /// Readings taken so far.  `None` while the worker owns the sensor.
    pub fn total_reads(&self) -> Option<u32> {
        self.idle.as_ref().map(SimAccelerometer::total_reads)
    }
}

impl SensorPort for AccelerometerAdapter {
    fn subscribe(&mut self, interval: Duration, sink: SampleSink) -> Result<(), SensorError> {
        if self.worker.is_some() {
            return Err(SensorError::AlreadySubscribed);
        }
        // Lost only if a previous worker panicked.
        let accel = self.idle.take().ok_or(SensorError::HardwareAbsent)?;
        if let Err(e) = accel.check_available() {
            self.idle = Some(accel);
            return Err(e);
        }

        let interval = interval.max(MIN_INTERVAL);
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = std::thread::Builder::new()
            .name("tilt-sensor".into())
            .spawn(move || sample_loop(accel, interval, &sink, &flag))
            .map_err(|e| {
                warn!("Sensor worker spawn failed: {}", e);
                SensorError::HardwareAbsent
            })?;

        info!("Sensor subscribed ({}ms)", interval.as_millis());
        self.worker = Some(Worker { stop, handle });
        Ok(())
    }

    fn unsubscribe(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        worker.stop.store(true, Ordering::Release);
        worker.handle.thread().unpark();
        match worker.handle.join() {
            Ok(accel) => {
                debug!("Sensor unsubscribed after {} reads", accel.total_reads());
                self.idle = Some(accel);
            }
            Err(_) => warn!("Sensor worker panicked; sensor lost"),
        }
    }
}

impl Drop for AccelerometerAdapter {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Worker body: read, push, sleep to the next deadline.  Deadlines advance
/// by whole intervals so a slow push does not drift the cadence.
fn sample_loop(
    mut accel: SimAccelerometer,
    interval: Duration,
    sink: &SampleSink,
    stop: &AtomicBool,
) -> SimAccelerometer {
    let opened = Instant::now();
    let mut deadline = opened;
    let mut dropped = 0u32;

    while !stop.load(Ordering::Acquire) {
        let sample = accel.read(opened.elapsed().as_secs_f32());
        if sink.push(sample) == Delivery::Dropped {
            dropped = dropped.saturating_add(1);
        }

        deadline += interval;
        loop {
            if stop.load(Ordering::Acquire) {
                break;
            }
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            std::thread::park_timeout(deadline - now);
        }
    }

    if dropped > 0 {
        debug!("Sensor worker saw {} dropped samples", dropped);
    }
    accel
}
