//! Tilt mapper: the per-sample pipeline from raw tilt to indicator state.
//!
//! ```text
//!   TiltSample ──▶ finite? ──▶ scale ──▶ clamp ──▶ target offset ──▶ MotionSmoother ──▶ rendered
//!                    │                       └──▶ AlignmentDetector ──▶ feedback trigger
//!                    └── non-finite: dropped, nothing downstream touched
//! ```
//!
//! The mapper is split in two halves that can live in different timing
//! domains: [`TargetStage`] runs on every sensor sample, [`MotionSmoother`]
//! runs on every render tick.  [`TiltMapper`] keeps both together for
//! single-threaded callers; [`TiltMapper::into_parts`] hands them out
//! separately to the session.

use core::time::Duration;

use log::trace;

use crate::alignment::{Alignment, AlignmentDetector};
use crate::config::{FeedbackMode, LevelConfig, Sensitivity};
use crate::control::spring::MotionSmoother;
use crate::error::{Error, Result};
use crate::geometry::{Offset, clamp_to_travel, raw_displacement};
use crate::sensors::{Readout, TiltSample};

/// What one accepted sample produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleOutcome {
    /// Clamped, unsmoothed offset implied by the sample.
    pub target: Offset,
    /// The sample's x/y for the numeric display.
    pub readout: Readout,
    pub alignment: Alignment,
}

// ───────────────────────────────────────────────────────────────
// TargetStage (sensor domain)
// ───────────────────────────────────────────────────────────────

/// Validate, scale, clamp and classify incoming samples.
pub struct TargetStage {
    travel_limit: f32,
    sensitivity: Sensitivity,
    detector: AlignmentDetector,
    target: Offset,
    readout: Readout,
    accepted: u32,
    dropped: u32,
}

impl TargetStage {
    /// Build from an already validated config.
    pub fn new(config: &LevelConfig) -> Self {
        Self {
            travel_limit: config.travel_limit(),
            sensitivity: config.sensitivity,
            detector: AlignmentDetector::new(config.alignment_threshold, config.feedback),
            target: Offset::CENTER,
            readout: Readout::default(),
            accepted: 0,
            dropped: 0,
        }
    }

    /// Run one sample through the pipeline.
    ///
    /// A sample with any non-finite component is rejected with
    /// [`Error::MalformedSample`] and leaves every piece of state untouched
    /// apart from the drop counter.
    pub fn process(&mut self, sample: &TiltSample) -> Result<SampleOutcome> {
        if !sample.is_finite() {
            self.dropped = self.dropped.saturating_add(1);
            return Err(Error::MalformedSample);
        }

        let raw = raw_displacement(sample, self.sensitivity);
        let target = clamp_to_travel(raw, self.travel_limit);
        if target != raw {
            trace!(
                "clamp: ({:.1}, {:.1}) -> ({:.1}, {:.1})",
                raw.x, raw.y, target.x, target.y
            );
        }
        let alignment = self.detector.update(sample.x, sample.y);

        self.target = target;
        self.readout = sample.readout();
        self.accepted = self.accepted.saturating_add(1);

        Ok(SampleOutcome {
            target,
            readout: self.readout,
            alignment,
        })
    }

    pub fn target(&self) -> Offset {
        self.target
    }

    pub fn readout(&self) -> Readout {
        self.readout
    }

    pub fn aligned(&self) -> bool {
        self.detector.aligned()
    }

    /// Samples accepted since construction or the last reset.
    pub fn accepted(&self) -> u32 {
        self.accepted
    }

    /// Samples dropped as malformed since construction or the last reset.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    pub fn set_feedback_mode(&mut self, mode: FeedbackMode) {
        self.detector.set_mode(mode);
    }

    /// Back to the session-start state: centered, not aligned, counters zero.
    pub fn reset(&mut self) {
        self.detector.reset();
        self.target = Offset::CENTER;
        self.readout = Readout::default();
        self.accepted = 0;
        self.dropped = 0;
    }
}

// ───────────────────────────────────────────────────────────────
// TiltMapper
// ───────────────────────────────────────────────────────────────

/// Both halves of the pipeline driven from one thread.
pub struct TiltMapper {
    stage: TargetStage,
    smoother: MotionSmoother,
}

impl TiltMapper {
    /// Validate `config` and build a mapper at rest in the center.
    pub fn new(config: &LevelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            stage: TargetStage::new(config),
            smoother: MotionSmoother::new(config.spring).with_travel_limit(config.travel_limit()),
        })
    }

    /// Feed one sensor sample.  The smoother is retargeted but not advanced.
    pub fn on_sample(&mut self, sample: &TiltSample) -> Result<SampleOutcome> {
        let outcome = self.stage.process(sample)?;
        self.smoother.retarget(outcome.target);
        Ok(outcome)
    }

    /// Advance the smoother by `elapsed` render time.
    pub fn tick(&mut self, elapsed: Duration) -> Offset {
        self.smoother.advance(elapsed)
    }

    pub fn rendered(&self) -> Offset {
        self.smoother.offset()
    }

    pub fn target(&self) -> Offset {
        self.stage.target()
    }

    pub fn readout(&self) -> Readout {
        self.stage.readout()
    }

    pub fn aligned(&self) -> bool {
        self.stage.aligned()
    }

    pub fn dropped(&self) -> u32 {
        self.stage.dropped()
    }

    pub fn reset(&mut self) {
        self.stage.reset();
        self.smoother.reset();
    }

    /// Split into the sensor-domain and render-domain halves.
    pub fn into_parts(self) -> (TargetStage, MotionSmoother) {
        (self.stage, self.smoother)
    }
}
