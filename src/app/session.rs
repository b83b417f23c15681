//! Mapping session — the owned subscription handle.
//!
//! [`Session`] owns one [`LevelConfig`], the sensor port and both halves of
//! the tilt mapper.  It splits them across the two timing domains:
//!
//! ```text
//!   sensor thread                              render clock
//!  ┌───────────────────────────┐             ┌──────────────────────────┐
//!  │ SampleSink::push          │             │ Session::render_tick     │
//!  │  TargetStage (validate,   │ TargetSlot  │  MotionSmoother.advance  │
//!  │  clamp, detect) ──────────┼────────────▶│  ──▶ Frame ──▶ Display   │
//!  │  HapticPort on rising edge│ (1 value)   │                          │
//!  └───────────────────────────┘             └──────────────────────────┘
//! ```
//!
//! The sample handler lives behind one mutex together with the session's
//! active flag.  Stopping takes that mutex, so once [`Session::stop`] (or
//! [`StopHandle::stop`]) returns, no sample callback can do further work.
//! All filter state is rebuilt at zero on every [`Session::start`].

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use core::time::Duration;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use log::{info, warn};

use crate::config::{IndicatorColor, LevelConfig};
use crate::control::spring::MotionSmoother;
use crate::error::{Error, Result};
use crate::handoff::{TargetSlot, TargetUpdate};
use crate::mapper::{TargetStage, TiltMapper};
use crate::sensors::TiltSample;

use super::commands::LevelCommand;
use super::events::LevelEvent;
use super::ports::{EventSink, Frame, HapticPort, SensorPort};

// ───────────────────────────────────────────────────────────────
// Shared state (sensor domain ↔ session owner)
// ───────────────────────────────────────────────────────────────

/// Sensor-domain state.  Only touched with [`Shared::handler`] held.
struct SampleHandler {
    stage: TargetStage,
    haptic: Box<dyn HapticPort + Send>,
    events: Box<dyn EventSink + Send>,
    /// Bumped on every start; sinks from an earlier run are ignored.
    generation: u64,
}

struct Shared {
    handler: Mutex<SampleHandler>,
    /// Written only with `handler` held; read lock-free by the render tick.
    active: AtomicBool,
    slot: TargetSlot,
    color: AtomicU8,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SampleHandler> {
        // A panicking adapter must not wedge the session.
        self.handler.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Deactivate under the handler lock.  Returns whether it was active.
    fn cancel(&self) -> bool {
        let _guard = self.lock();
        let was_active = self.active.swap(false, Ordering::AcqRel);
        self.slot.clear();
        was_active
    }

    fn emit(&self, event: &LevelEvent) {
        self.lock().events.emit(event);
    }

    fn color(&self) -> IndicatorColor {
        IndicatorColor::from_u8(self.color.load(Ordering::Relaxed))
    }
}

// ───────────────────────────────────────────────────────────────
// SampleSink: handed to the SensorPort
// ───────────────────────────────────────────────────────────────

/// What happened to a pushed sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Processed and published to the render domain.
    Accepted,
    /// Non-finite component; discarded, previous target kept.
    Dropped,
    /// The session is stopped or this sink belongs to an earlier run.
    Ignored,
}

/// Callback target for a [`SensorPort`].  Cheap to clone, `Send + Sync`.
#[derive(Clone)]
pub struct SampleSink {
    shared: Arc<Shared>,
    generation: u64,
}

impl SampleSink {
    /// Run one sample through the sensor-domain half of the pipeline.
    pub fn push(&self, sample: TiltSample) -> Delivery {
        let mut h = self.shared.lock();
        if !self.shared.is_active() || h.generation != self.generation {
            return Delivery::Ignored;
        }

        match h.stage.process(&sample) {
            Ok(outcome) => {
                self.shared.slot.publish(TargetUpdate {
                    target: outcome.target,
                    readout: outcome.readout,
                    aligned: outcome.alignment.aligned,
                });
                if outcome.alignment.changed {
                    h.events.emit(&LevelEvent::AlignmentChanged {
                        aligned: outcome.alignment.aligned,
                    });
                }
                if outcome.alignment.trigger {
                    h.haptic.pulse();
                }
                Delivery::Accepted
            }
            Err(e) => {
                let total = h.stage.dropped();
                warn!("Sample dropped ({}), {} so far this session", e, total);
                h.events.emit(&LevelEvent::SampleDropped { total });
                Delivery::Dropped
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// StopHandle: cancellation from another task or thread
// ───────────────────────────────────────────────────────────────

/// Cloneable cancellation token for a running session.
///
/// Stops the sample handler and the render tick.  The sensor subscription
/// itself is released by the owner's next [`Session::stop`] (or drop).
#[derive(Clone)]
pub struct StopHandle {
    shared: Arc<Shared>,
}

impl StopHandle {
    /// Idempotent.  After this returns no sample is processed and
    /// [`Session::render_tick`] yields `None`.
    pub fn stop(&self) {
        if self.shared.cancel() {
            info!("Session cancelled");
        }
    }

    pub fn is_stopped(&self) -> bool {
        !self.shared.is_active()
    }
}

// ───────────────────────────────────────────────────────────────
// Session
// ───────────────────────────────────────────────────────────────

pub struct Session<S: SensorPort> {
    config: LevelConfig,
    sensor: S,
    shared: Arc<Shared>,
    smoother: MotionSmoother,
    frame: Frame,
    last_tick: Option<Instant>,
    running: bool,
}

impl<S: SensorPort> Session<S> {
    /// Validate `config` and assemble a stopped session.
    ///
    /// Fails fast with [`Error::ConfigInvalid`]; nothing is subscribed.
    pub fn new(
        config: LevelConfig,
        sensor: S,
        haptic: impl HapticPort + Send + 'static,
        events: impl EventSink + Send + 'static,
    ) -> Result<Self> {
        let (stage, smoother) = TiltMapper::new(&config)?.into_parts();
        let color = IndicatorColor::default();
        let shared = Arc::new(Shared {
            handler: Mutex::new(SampleHandler {
                stage,
                haptic: Box::new(haptic),
                events: Box::new(events),
                generation: 0,
            }),
            active: AtomicBool::new(false),
            slot: TargetSlot::new(),
            color: AtomicU8::new(color.as_u8()),
        });

        Ok(Self {
            config,
            sensor,
            shared,
            smoother,
            frame: Frame::centered(color),
            last_tick: None,
            running: false,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Open the sensor subscription with fresh filter state.
    ///
    /// On [`Error::SensorUnavailable`] the session stays stopped with the
    /// indicator centered; re-subscribing is up to the caller.  A session
    /// cancelled through a [`StopHandle`] is fully stopped first, then
    /// started afresh.
    pub fn start(&mut self) -> Result<()> {
        if self.running {
            if self.shared.is_active() {
                return Ok(());
            }
            self.stop();
        }

        self.reset_render_state();
        let generation = {
            let mut h = self.shared.lock();
            h.stage.reset();
            h.generation = h.generation.wrapping_add(1);
            self.shared.slot.clear();
            self.shared.active.store(true, Ordering::Release);
            h.generation
        };

        let sink = SampleSink {
            shared: Arc::clone(&self.shared),
            generation,
        };
        match self.sensor.subscribe(self.config.sample_interval(), sink) {
            Ok(()) => {
                self.running = true;
                self.shared.emit(&LevelEvent::Started {
                    interval_ms: self.config.sample_interval_ms,
                });
                info!(
                    "Session started (interval={}ms, travel limit={:.1}px)",
                    self.config.sample_interval_ms,
                    self.config.travel_limit()
                );
                Ok(())
            }
            Err(e) => {
                self.shared.cancel();
                self.shared.emit(&LevelEvent::SensorUnavailable(e));
                warn!("Sensor unavailable: {}", e);
                Err(Error::SensorUnavailable(e))
            }
        }
    }

    /// End the session.  Idempotent.
    ///
    /// Cancels both domains, releases the sensor subscription and discards
    /// the smoother state rather than letting it settle.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.shared.cancel();
        self.sensor.unsubscribe();

        let (accepted, dropped) = {
            let h = self.shared.lock();
            (h.stage.accepted(), h.stage.dropped())
        };
        self.reset_render_state();
        self.shared.emit(&LevelEvent::Stopped { accepted, dropped });
        info!("Session stopped ({} samples, {} dropped)", accepted, dropped);
    }

    /// Cancellation token usable from another task or thread.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    // ── Render domain ─────────────────────────────────────────

    /// Advance the smoother to `now` and produce the frame to draw.
    ///
    /// Returns `None` once the session is stopped or cancelled.  The first
    /// tick after start advances by zero time.
    pub fn render_tick(&mut self, now: Instant) -> Option<Frame> {
        if !self.running || !self.shared.is_active() {
            return None;
        }

        let elapsed = self
            .last_tick
            .map_or(Duration::ZERO, |t| now.saturating_duration_since(t));
        self.last_tick = Some(now);

        if let Some(update) = self.shared.slot.take() {
            self.smoother.retarget(update.target);
            self.frame.readout = update.readout;
            self.frame.aligned = update.aligned;
        }
        self.frame.offset = self.smoother.advance(elapsed);
        self.frame.color = self.shared.color();
        Some(self.frame)
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (settings screen, navigation shell).
    pub fn handle_command(&mut self, cmd: LevelCommand) {
        match cmd {
            LevelCommand::SetIndicatorColor(color) => {
                let prev = self
                    .shared
                    .color
                    .swap(color.as_u8(), Ordering::Relaxed);
                self.frame.color = color;
                if prev != color.as_u8() {
                    self.shared.emit(&LevelEvent::ColorChanged(color));
                    info!("Indicator colour set to {}", color.name());
                }
            }
            LevelCommand::SetFeedbackMode(mode) => {
                self.config.feedback = mode;
                self.shared.lock().stage.set_feedback_mode(mode);
                info!("Feedback mode set to {:?}", mode);
            }
            LevelCommand::Stop => self.stop(),
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.running && self.shared.is_active()
    }

    /// Most recent frame (centered while stopped).
    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    // ── Internal ──────────────────────────────────────────────

    fn reset_render_state(&mut self) {
        self.smoother.reset();
        self.last_tick = None;
        self.frame = Frame::centered(self.shared.color());
    }
}

impl<S: SensorPort> Drop for Session<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
