//! Session configuration parameters
//!
//! All tunable parameters for one mapping session.  A [`LevelConfig`] is
//! immutable for the lifetime of a session; it is supplied by the settings
//! UI (or a JSON document) and validated before any sensor is touched.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::control::spring::MAX_SUBSTEP_SECS;
use crate::error::{Error, Result};

/// Core level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    // --- Geometry ---
    /// Radius of the boundary ring the indicator travels inside (px)
    pub travel_radius: f32,
    /// Radius of the indicator itself (px)
    pub indicator_radius: f32,
    /// Raw-displacement scale applied to the sample's x/y components
    pub sensitivity: Sensitivity,

    // --- Alignment ---
    /// Per-axis tilt below which the device counts as level (unitless)
    pub alignment_threshold: f32,
    /// When the haptic pulse fires while aligned
    pub feedback: FeedbackMode,

    // --- Motion ---
    /// Spring-damper tuning for the rendered offset
    pub spring: SpringConfig,

    // --- Timing ---
    /// Requested sensor sample interval (milliseconds)
    pub sample_interval_ms: u32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            // Geometry
            travel_radius: 100.0,
            indicator_radius: 25.0,
            sensitivity: Sensitivity::default(),

            // Alignment
            alignment_threshold: 0.05,
            feedback: FeedbackMode::RisingEdge,

            // Motion
            spring: SpringConfig::default(),

            // Timing
            sample_interval_ms: 100, // 10 Hz
        }
    }
}

impl LevelConfig {
    /// Parse a settings document and validate it.
    ///
    /// Missing fields fall back to [`LevelConfig::default()`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            log::warn!("config: JSON parse failed: {}", e);
            Error::ConfigInvalid("settings document is not valid JSON")
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject any configuration the core cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if !is_positive(self.travel_radius) {
            return Err(Error::ConfigInvalid("travel_radius must be positive"));
        }
        if !is_positive(self.indicator_radius) {
            return Err(Error::ConfigInvalid("indicator_radius must be positive"));
        }
        if self.indicator_radius > self.travel_radius {
            return Err(Error::ConfigInvalid(
                "indicator_radius must not exceed travel_radius",
            ));
        }
        if !is_positive(self.alignment_threshold) {
            return Err(Error::ConfigInvalid("alignment_threshold must be positive"));
        }
        if self.sample_interval_ms == 0 {
            return Err(Error::ConfigInvalid("sample_interval_ms must be positive"));
        }
        if !is_positive(self.sensitivity.x) || !is_positive(self.sensitivity.y) {
            return Err(Error::ConfigInvalid("sensitivity must be positive on both axes"));
        }
        if !is_positive(self.spring.stiffness) {
            return Err(Error::ConfigInvalid("spring stiffness must be positive"));
        }
        if !is_positive(self.spring.damping_ratio) {
            return Err(Error::ConfigInvalid("spring damping_ratio must be positive"));
        }
        if !self.spring.is_stable_at(MAX_SUBSTEP_SECS) {
            return Err(Error::ConfigInvalid(
                "spring too stiff or too heavily damped for the integration step",
            ));
        }
        Ok(())
    }

    /// Largest distance the indicator's center may sit from the ring's
    /// center without its edge crossing the ring.
    pub fn travel_limit(&self) -> f32 {
        self.travel_radius - self.indicator_radius
    }

    /// Sample interval as a [`Duration`].
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.sample_interval_ms))
    }
}

fn is_positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

/// Pixels of raw displacement per unit of tilt, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sensitivity {
    pub x: f32,
    pub y: f32,
}

impl Sensitivity {
    /// Half-viewport scaling: full tilt on an axis moves the indicator by
    /// half the viewport's extent on that axis.
    pub fn from_viewport(width: f32, height: f32) -> Self {
        Self {
            x: width / 2.0,
            y: height / 2.0,
        }
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        // Uniform scale (360 px wide viewport) so the offset keeps the
        // tilt's direction.
        Self { x: 180.0, y: 180.0 }
    }
}

/// Spring-damper tuning for the motion smoother.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Spring constant `k` (s⁻²).  `sqrt(k)` is the natural frequency.
    pub stiffness: f32,
    /// `ζ`; 1.0 is critical damping, above 1.0 overdamped.
    pub damping_ratio: f32,
}

impl SpringConfig {
    /// Damping coefficient `c = 2·ζ·sqrt(k)`.
    pub fn damping(&self) -> f32 {
        2.0 * self.damping_ratio * self.stiffness.sqrt()
    }

    /// Whether semi-implicit Euler with steps of at most `step_secs` keeps
    /// this spring convergent.  Requires `h·c ≤ 1` and `h²·k ≤ 1`, inside
    /// the stability bound `h·c < 2`, `h²·k + 2·h·c < 4`.
    pub fn is_stable_at(&self, step_secs: f32) -> bool {
        step_secs * self.damping() <= 1.0 && step_secs * step_secs * self.stiffness <= 1.0
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 300.0,   // ω ≈ 17 rad/s, settles in ~0.3 s
            damping_ratio: 1.0, // critical
        }
    }
}

/// When the alignment feedback pulse fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackMode {
    /// Once per aligned run, on the not-aligned → aligned transition.
    #[default]
    RisingEdge,
    /// On every sample that classifies as aligned.
    EverySample,
}

/// Indicator theme colour, chosen in the settings screen and applied live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum IndicatorColor {
    #[default]
    Blue = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Purple = 4,
    Orange = 5,
}

impl IndicatorColor {
    /// Every colour the settings screen offers, in display order.
    pub const ALL: [Self; 6] = [
        Self::Blue,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Purple,
        Self::Orange,
    ];

    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode a stored discriminant.  Unknown values map to the default.
    pub const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Red,
            2 => Self::Green,
            3 => Self::Yellow,
            4 => Self::Purple,
            5 => Self::Orange,
            _ => Self::Blue,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Purple => "purple",
            Self::Orange => "orange",
        }
    }
}
