//! Simulated three-axis accelerometer.
//!
//! Stands in for the platform motion sensor on host builds.  Two modes:
//!
//! - **Injected**: the reading is whatever was last stored through a
//!   [`TiltInjector`], so tests can steer the device's attitude from another
//!   thread.
//! - **Sweep**: the device slowly rocks through level on a Lissajous path,
//!   which exercises clamping, smoothing and alignment in the demo binary.
//!
//! Availability is configurable so the unavailable-sensor path can be
//! driven without real permissions or hardware.

use core::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use super::TiltSample;
use crate::error::SensorError;

/// Lock-free cell holding the injected x/y/z as `f32` bit patterns.
#[derive(Debug, Default)]
struct InjectedTilt {
    x: AtomicU32,
    y: AtomicU32,
    z: AtomicU32,
}

/// Cloneable handle that sets the simulated device attitude.
#[derive(Debug, Clone)]
pub struct TiltInjector {
    cell: Arc<InjectedTilt>,
}

impl TiltInjector {
    pub fn set(&self, sample: TiltSample) {
        self.cell.x.store(sample.x.to_bits(), Ordering::Relaxed);
        self.cell.y.store(sample.y.to_bits(), Ordering::Relaxed);
        self.cell.z.store(sample.z.to_bits(), Ordering::Relaxed);
    }
}

#[derive(Debug, Clone, Copy)]
enum Pattern {
    Injected,
    Sweep { amplitude: f32, period_secs: f32 },
}

pub struct SimAccelerometer {
    pattern: Pattern,
    injected: Arc<InjectedTilt>,
    availability: Result<(), SensorError>,
    total_reads: u32,
}

impl SimAccelerometer {
    /// Accelerometer whose reading is set through [`Self::injector`].
    /// Starts level.
    pub fn injected() -> Self {
        let accel = Self {
            pattern: Pattern::Injected,
            injected: Arc::new(InjectedTilt::default()),
            availability: Ok(()),
            total_reads: 0,
        };
        accel.injector().set(TiltSample::LEVEL);
        accel
    }

    /// Accelerometer that rocks through level with the given peak tilt.
    pub fn sweep(amplitude: f32, period_secs: f32) -> Self {
        Self {
            pattern: Pattern::Sweep {
                amplitude,
                period_secs,
            },
            ..Self::injected()
        }
    }

    /// Make every subscription attempt fail with `error`.
    pub fn unavailable(mut self, error: SensorError) -> Self {
        self.availability = Err(error);
        self
    }

    pub fn injector(&self) -> TiltInjector {
        TiltInjector {
            cell: Arc::clone(&self.injected),
        }
    }

    /// Check that the sensor can deliver samples.
    pub fn check_available(&self) -> Result<(), SensorError> {
        self.availability
    }

    pub fn total_reads(&self) -> u32 {
        self.total_reads
    }

    /// Take one reading.  `elapsed_secs` is time since the subscription opened.
    pub fn read(&mut self, elapsed_secs: f32) -> TiltSample {
        self.total_reads = self.total_reads.saturating_add(1);
        match self.pattern {
            Pattern::Injected => TiltSample::new(
                f32::from_bits(self.injected.x.load(Ordering::Relaxed)),
                f32::from_bits(self.injected.y.load(Ordering::Relaxed)),
                f32::from_bits(self.injected.z.load(Ordering::Relaxed)),
            ),
            Pattern::Sweep {
                amplitude,
                period_secs,
            } => sweep_sample(amplitude, period_secs, elapsed_secs),
        }
    }
}

/// 1:2 Lissajous rocking path.  Passes through (0, 0) at every multiple of
/// half the period; z carries the remaining gravity.
fn sweep_sample(amplitude: f32, period_secs: f32, t: f32) -> TiltSample {
    let phase = core::f32::consts::TAU * t / period_secs.max(f32::EPSILON);
    let x = amplitude * phase.sin();
    let y = amplitude * (2.0 * phase).sin();
    let z = (1.0 - x * x - y * y).max(0.0).sqrt();
    TiltSample::new(x, y, z)
}
