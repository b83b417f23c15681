//! Spring-damper motion smoother for the rendered indicator offset.
//!
//! Each axis is an independent second-order system:
//!
//! ```text
//!   a = k·(target − position) − c·velocity,   c = 2·ζ·sqrt(k)
//! ```
//!
//! integrated with semi-implicit Euler (velocity first, then position).  The
//! elapsed time of one advance is split into equal substeps of at most
//! [`MAX_SUBSTEP_SECS`], so a slow render clock never feeds the integrator a
//! step large enough to go unstable.  Tunings outside the region where that
//! step is stable are rejected by
//! [`LevelConfig::validate`](crate::config::LevelConfig::validate).  With
//! ζ = 1 the discrete update has real, positive eigenvalues for every substep
//! this module takes, so a step response from rest approaches the target
//! without crossing it.
//!
//! The smoother is retargeted on every sensor sample and advanced on every
//! render tick; the two cadences are unrelated.

use core::time::Duration;

use crate::config::SpringConfig;
use crate::geometry::Offset;

/// Longest single integration step (seconds).
pub const MAX_SUBSTEP_SECS: f32 = 1.0 / 240.0;

/// Elapsed time beyond this per advance is dropped (render stall, debugger).
pub const MAX_ADVANCE_SECS: f32 = 0.25;

/// Below this distance and speed (px, px/s) an axis snaps onto its target.
const SETTLE_EPSILON: f32 = 1e-3;

/// One axis of the spring-damper.
#[derive(Debug, Clone, Copy)]
pub struct SpringAxis {
    stiffness: f32,
    damping: f32,
    target: f32,
    position: f32,
    velocity: f32,
}

impl SpringAxis {
    pub fn new(spring: SpringConfig) -> Self {
        Self {
            stiffness: spring.stiffness,
            damping: spring.damping(),
            target: 0.0,
            position: 0.0,
            velocity: 0.0,
        }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Integrate one substep of `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        let accel = self.stiffness * (self.target - self.position) - self.damping * self.velocity;
        self.velocity += accel * dt;
        self.position += self.velocity * dt;

        if (self.target - self.position).abs() < SETTLE_EPSILON
            && self.velocity.abs() < SETTLE_EPSILON
        {
            self.position = self.target;
            self.velocity = 0.0;
        }
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Back to rest at zero with a zero target.
    pub fn reset(&mut self) {
        self.target = 0.0;
        self.position = 0.0;
        self.velocity = 0.0;
    }
}

/// Two independent spring axes plus an optional hard wall at the travel limit.
#[derive(Debug, Clone, Copy)]
pub struct MotionSmoother {
    x: SpringAxis,
    y: SpringAxis,
    travel_limit: Option<f32>,
}

impl MotionSmoother {
    pub fn new(spring: SpringConfig) -> Self {
        Self {
            x: SpringAxis::new(spring),
            y: SpringAxis::new(spring),
            travel_limit: None,
        }
    }

    /// Keep the rendered offset inside the disc of radius `limit`, even while
    /// the spring is carrying momentum from a retarget.
    pub fn with_travel_limit(mut self, limit: f32) -> Self {
        self.travel_limit = Some(limit);
        self
    }

    /// Point the spring at a new target.  Position and velocity carry over.
    pub fn retarget(&mut self, target: Offset) {
        self.x.set_target(target.x);
        self.y.set_target(target.y);
    }

    /// Advance by `elapsed` real time and return the rendered offset.
    pub fn advance(&mut self, elapsed: Duration) -> Offset {
        let dt = elapsed.as_secs_f32().min(MAX_ADVANCE_SECS);
        if dt <= 0.0 {
            return self.offset();
        }

        let steps = (dt / MAX_SUBSTEP_SECS).ceil().max(1.0) as u32;
        let h = dt / steps as f32;
        for _ in 0..steps {
            self.x.step(h);
            self.y.step(h);
            self.enforce_wall();
        }
        self.offset()
    }

    /// Current rendered offset.
    pub fn offset(&self) -> Offset {
        Offset::new(self.x.position(), self.y.position())
    }

    /// Target the spring is relaxing toward.
    pub fn target(&self) -> Offset {
        Offset::new(self.x.target(), self.y.target())
    }

    /// Current velocity (px/s).
    pub fn velocity(&self) -> Offset {
        Offset::new(self.x.velocity(), self.y.velocity())
    }

    /// Rendered offset is within `epsilon` of the target.
    pub fn is_settled(&self, epsilon: f32) -> bool {
        self.offset().distance_to(self.target()) <= epsilon
    }

    /// Back to rest at the center.
    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }

    /// Project a position that left the disc back onto its edge and drop the
    /// outward radial component of the velocity.
    fn enforce_wall(&mut self) {
        let Some(limit) = self.travel_limit else {
            return;
        };
        let pos = self.offset();
        let r = pos.norm();
        if r <= limit {
            return;
        }
        let (nx, ny) = (pos.x / r, pos.y / r);
        self.x.position = nx * limit;
        self.y.position = ny * limit;

        let radial = self.x.velocity * nx + self.y.velocity * ny;
        if radial > 0.0 {
            self.x.velocity -= radial * nx;
            self.y.velocity -= radial * ny;
        }
    }
}
