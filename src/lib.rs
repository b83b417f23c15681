//! Tilt level core library.
//!
//! Maps three-axis accelerometer samples to the on-screen position of a
//! bubble indicator: clamp to the travel ring, detect alignment, smooth the
//! motion.  Platform I/O lives behind the port traits in [`app::ports`];
//! host adapters for the demo binary and tests live in [`adapters`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod alignment;
pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod geometry;
pub mod handoff;
pub mod mapper;
pub mod render;
pub mod sensors;
