//! Alignment detector.
//!
//! Classifies each sample as level / not level and decides whether the
//! haptic feedback pulse should fire.  The classification is a pure function
//! of the latest sample: `|x| < threshold && |y| < threshold`, checked per
//! axis (no combined-magnitude test).  The only state carried between samples
//! is the previous classification, used for rising-edge detection.

use log::debug;

use crate::config::FeedbackMode;

/// Result of classifying one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    /// The sample is within the threshold on both axes.
    pub aligned: bool,
    /// The feedback pulse should fire for this sample.
    pub trigger: bool,
    /// `aligned` differs from the previous sample's classification.
    pub changed: bool,
}

pub struct AlignmentDetector {
    threshold: f32,
    mode: FeedbackMode,
    previous: bool,
}

impl AlignmentDetector {
    pub fn new(threshold: f32, mode: FeedbackMode) -> Self {
        Self {
            threshold,
            mode,
            previous: false,
        }
    }

    /// Pure classification, no state touched.
    pub fn is_aligned(&self, x: f32, y: f32) -> bool {
        x.abs() < self.threshold && y.abs() < self.threshold
    }

    /// Classify the sample's x/y and update the edge state.
    pub fn update(&mut self, x: f32, y: f32) -> Alignment {
        let aligned = self.is_aligned(x, y);
        let rising = aligned && !self.previous;
        let changed = aligned != self.previous;
        self.previous = aligned;

        if changed {
            debug!("alignment: {}", if aligned { "level" } else { "off level" });
        }

        let trigger = match self.mode {
            FeedbackMode::RisingEdge => rising,
            FeedbackMode::EverySample => aligned,
        };
        Alignment {
            aligned,
            trigger,
            changed,
        }
    }

    /// Last classification.
    pub fn aligned(&self) -> bool {
        self.previous
    }

    pub fn set_mode(&mut self, mode: FeedbackMode) {
        self.mode = mode;
    }

    /// Forget the edge state; the next aligned sample counts as a rising edge.
    pub fn reset(&mut self) {
        self.previous = false;
    }
}
