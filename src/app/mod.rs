//! Application core — session orchestration, zero platform I/O.
//!
//! This module owns the lifecycle of one mapping session: subscribing to the
//! sensor, splitting the tilt mapper across the sensor and render domains,
//! firing haptic feedback and emitting events.  All interaction with the
//! platform happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without a device.

pub mod commands;
pub mod events;
pub mod ports;
pub mod session;
