//! Geometry clamp: keeps the indicator inside its boundary ring.
//!
//! The indicator's center may travel at most `R = travel_radius −
//! indicator_radius` from the ring's center.  Points beyond `R` are projected
//! radially onto the circle of radius `R`, which keeps the mapping
//! continuous at the boundary and preserves the tilt's direction.

use serde::{Deserialize, Serialize};

use crate::config::Sensitivity;
use crate::sensors::TiltSample;

/// Signed displacement from the ring's center, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const CENTER: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance from center.
    pub fn norm(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Euclidean distance to another offset.
    pub fn distance_to(self, other: Self) -> f32 {
        Self::new(self.x - other.x, self.y - other.y).norm()
    }
}

/// Scale a sample's x/y tilt into a raw (unclamped) pixel displacement.
pub fn raw_displacement(sample: &TiltSample, sensitivity: Sensitivity) -> Offset {
    Offset::new(sample.x * sensitivity.x, sample.y * sensitivity.y)
}

/// Bound `raw` to the disc of radius `limit`.
///
/// Inside the disc the input is returned unchanged (bit-for-bit); outside it
/// is projected onto the circle along its own direction.  Total over finite
/// inputs; non-finite samples must be filtered before reaching this point.
pub fn clamp_to_travel(raw: Offset, limit: f32) -> Offset {
    let distance = raw.norm();
    if distance <= limit {
        return raw;
    }
    let angle = raw.y.atan2(raw.x);
    Offset::new(limit * angle.cos(), limit * angle.sin())
}
