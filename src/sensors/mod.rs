//! Sensor subsystem: the tilt sample type and the accelerometer driver.
//!
//! A [`TiltSample`] is consumed by the sensor-domain handler and never
//! retained; only its `(x, y)` [`Readout`] travels on to the display.

pub mod accelerometer;

use serde::{Deserialize, Serialize};

/// One three-axis acceleration reading (unitless, ~[-1, 1] at rest).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TiltSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl TiltSample {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Device lying flat: gravity entirely on z.
    pub const LEVEL: Self = Self::new(0.0, 0.0, 1.0);

    /// True when every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// The components shown in the numeric readout.
    pub fn readout(&self) -> Readout {
        Readout {
            x: self.x,
            y: self.y,
        }
    }
}

/// Latest raw x/y tilt for the numeric display.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Readout {
    pub x: f32,
    pub y: f32,
}
