//! Unified error types for the tilt level core.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! session's error handling uniform.  All variants are `Copy` so they can be
//! handed across the sensor and render domains without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the core funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The sensor subscription could not be established.
    SensorUnavailable(SensorError),
    /// A sample carried a NaN or infinite component and was dropped.
    MalformedSample,
    /// Configuration is invalid; the `&'static str` names the field and why.
    ConfigInvalid(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SensorUnavailable(e) => write!(f, "sensor unavailable: {e}"),
            Self::MalformedSample => write!(f, "malformed sample (non-finite component)"),
            Self::ConfigInvalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Reasons a [`SensorPort`](crate::app::ports::SensorPort) may refuse a
/// subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The platform denied access to the motion sensor.
    PermissionDenied,
    /// No accelerometer is present on this device.
    HardwareAbsent,
    /// The source is already delivering samples to another sink.
    AlreadySubscribed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::HardwareAbsent => write!(f, "hardware absent"),
            Self::AlreadySubscribed => write!(f, "already subscribed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::SensorUnavailable(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
