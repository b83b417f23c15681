//! Inbound commands to the session.
//!
//! These represent actions requested by the outside world (the settings
//! screen, the navigation shell) that the
//! [`Session`](super::session::Session) interprets and acts upon.

use crate::config::{FeedbackMode, IndicatorColor};

/// Commands that external adapters can send into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelCommand {
    /// Apply a new indicator colour without touching the subscription.
    SetIndicatorColor(IndicatorColor),

    /// Switch when the haptic pulse fires.  Takes effect from the next
    /// sample; edge state is kept.
    SetFeedbackMode(FeedbackMode),

    /// The level screen is being left; end the session.
    Stop,
}
