//! Integration tests for the Session → mapper → ports pipeline.
//!
//! Samples are pushed by hand through the mock sensor and render ticks are
//! driven with synthetic timestamps, so every test is deterministic.

use std::time::{Duration, Instant};

use crate::mock_hw::{CountingHaptic, MockSensor, RecordingSink};

use tiltlevel::app::commands::LevelCommand;
use tiltlevel::app::events::LevelEvent;
use tiltlevel::app::ports::{Delivery, Frame};
use tiltlevel::app::session::Session;
use tiltlevel::config::{FeedbackMode, IndicatorColor, LevelConfig};
use tiltlevel::error::{Error, SensorError};
use tiltlevel::geometry::Offset;
use tiltlevel::sensors::TiltSample;

const FRAME: Duration = Duration::from_micros(16_667);

const ALIGNED: TiltSample = TiltSample::new(0.02, 0.01, 1.0);
const OFF_LEVEL: TiltSample = TiltSample::new(0.3, 0.0, 0.95);

struct Rig {
    session: Session<MockSensor>,
    sensor: MockSensor,
    haptic: CountingHaptic,
    sink: RecordingSink,
    clock: Instant,
}

impl Rig {
    fn new(config: LevelConfig) -> Self {
        let sensor = MockSensor::new();
        let haptic = CountingHaptic::default();
        let sink = RecordingSink::default();
        let session =
            Session::new(config, sensor.clone(), haptic.clone(), sink.clone()).unwrap();
        Self {
            session,
            sensor,
            haptic,
            sink,
            clock: Instant::now(),
        }
    }

    fn started() -> Self {
        let mut rig = Self::new(LevelConfig::default());
        rig.session.start().unwrap();
        rig
    }

    fn push(&self, sample: TiltSample) -> Delivery {
        self.sensor.push(sample).expect("sensor should be subscribed")
    }

    fn tick(&mut self) -> Option<Frame> {
        self.clock += FRAME;
        self.session.render_tick(self.clock)
    }

    /// Tick for about one second of render time.
    fn settle(&mut self) -> Frame {
        let mut last = None;
        for _ in 0..60 {
            last = self.tick();
        }
        last.expect("session should be rendering")
    }
}

fn close(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}

// ── Lifecycle ────────────────────────────────────────────────

#[test]
fn start_subscribes_with_configured_interval() {
    let rig = Rig::started();
    assert!(rig.session.is_running());
    assert_eq!(rig.sensor.subscribes(), 1);
    assert_eq!(rig.sensor.interval(), Some(Duration::from_millis(100)));
    assert_eq!(
        rig.sink.events(),
        vec![LevelEvent::Started { interval_ms: 100 }]
    );
}

#[test]
fn start_twice_does_not_resubscribe() {
    let mut rig = Rig::started();
    rig.session.start().unwrap();
    assert_eq!(rig.sensor.subscribes(), 1);
}

#[test]
fn stop_is_idempotent() {
    let mut rig = Rig::started();
    rig.session.stop();
    rig.session.stop();
    assert_eq!(rig.sensor.unsubscribes(), 1);
    assert_eq!(
        rig.sink.count(|e| matches!(e, LevelEvent::Stopped { .. })),
        1
    );
}

#[test]
fn stop_before_start_is_a_no_op() {
    let mut rig = Rig::new(LevelConfig::default());
    rig.session.stop();
    assert_eq!(rig.sensor.unsubscribes(), 0);
    assert!(rig.sink.events().is_empty());
}

#[test]
fn no_pulse_or_frame_after_stop() {
    let mut rig = Rig::started();
    rig.push(OFF_LEVEL);
    rig.session.stop();

    assert!(!rig.sensor.is_subscribed());
    // A callback racing with stop still holds the old sink.
    assert_eq!(rig.sensor.push_via(0, ALIGNED), Delivery::Ignored);
    assert_eq!(rig.haptic.pulses(), 0);
    assert!(rig.tick().is_none());
    assert_eq!(rig.session.frame().offset, Offset::CENTER);
}

#[test]
fn stop_command_ends_session() {
    let mut rig = Rig::started();
    rig.session.handle_command(LevelCommand::Stop);
    assert!(!rig.session.is_running());
    assert_eq!(rig.sensor.unsubscribes(), 1);
}

#[test]
fn dropping_session_unsubscribes() {
    let rig = Rig::started();
    let sensor = rig.sensor.clone();
    drop(rig);
    assert!(!sensor.is_subscribed());
    assert_eq!(sensor.unsubscribes(), 1);
}

#[test]
fn stop_handle_cancels_from_another_thread() {
    let mut rig = Rig::started();
    let handle = rig.session.stop_handle();
    std::thread::spawn(move || handle.stop()).join().unwrap();

    assert!(!rig.session.is_running());
    assert!(rig.tick().is_none());
    assert_eq!(rig.push(ALIGNED), Delivery::Ignored);
    assert_eq!(rig.haptic.pulses(), 0);

    // The owner still releases the subscription.
    rig.session.stop();
    assert!(!rig.sensor.is_subscribed());
}

#[test]
fn start_after_external_cancel_resubscribes() {
    let mut rig = Rig::started();
    rig.push(OFF_LEVEL);
    rig.session.stop_handle().stop();
    assert!(!rig.session.is_running());

    rig.session.start().unwrap();
    assert!(rig.session.is_running());
    assert_eq!(rig.sensor.subscribes(), 2);
    assert_eq!(rig.sensor.unsubscribes(), 1);
    assert_eq!(
        rig.sink.count(|e| matches!(e, LevelEvent::Stopped { .. })),
        1
    );

    assert_eq!(rig.push(ALIGNED), Delivery::Accepted);
    assert_eq!(rig.haptic.pulses(), 1);
    let frame = rig.tick().unwrap();
    assert_eq!(frame.offset, Offset::CENTER);
    assert!(frame.aligned);
}

// ── Sensor unavailable ───────────────────────────────────────

#[test]
fn sensor_unavailable_surfaces_once_with_centered_frame() {
    let sensor = MockSensor::failing(SensorError::PermissionDenied);
    let sink = RecordingSink::default();
    let mut session = Session::new(
        LevelConfig::default(),
        sensor.clone(),
        CountingHaptic::default(),
        sink.clone(),
    )
    .unwrap();

    assert_eq!(
        session.start(),
        Err(Error::SensorUnavailable(SensorError::PermissionDenied))
    );
    assert_eq!(sensor.subscribes(), 1, "no internal retry");
    assert!(!session.is_running());
    assert!(session.render_tick(Instant::now()).is_none());
    assert_eq!(session.frame().offset, Offset::CENTER);
    assert_eq!(
        sink.events(),
        vec![LevelEvent::SensorUnavailable(SensorError::PermissionDenied)]
    );

    // Stopping a never-started session emits nothing more.
    session.stop();
    assert_eq!(sink.events().len(), 1);
}

#[test]
fn invalid_config_fails_before_touching_sensor() {
    let sensor = MockSensor::new();
    let config = LevelConfig {
        indicator_radius: 150.0,
        ..LevelConfig::default()
    };
    let r = Session::new(
        config,
        sensor.clone(),
        CountingHaptic::default(),
        RecordingSink::default(),
    );
    assert!(matches!(r, Err(Error::ConfigInvalid(_))));
    assert_eq!(sensor.subscribes(), 0);
}

// ── Sample handling ──────────────────────────────────────────

#[test]
fn level_scenario_is_in_bounds_aligned_and_pulses() {
    let mut rig = Rig::started();
    assert_eq!(rig.push(ALIGNED), Delivery::Accepted);
    assert_eq!(rig.haptic.pulses(), 1);

    let frame = rig.settle();
    assert!(frame.aligned);
    assert!(frame.offset.norm() <= 75.0);
    assert!(close(frame.readout.x, 0.02, 1e-6));
    assert!(close(frame.readout.y, 0.01, 1e-6));
}

#[test]
fn steep_tilt_settles_on_ring_at_45_degrees() {
    let mut rig = Rig::started();
    rig.push(TiltSample::new(0.9, 0.9, 0.2));
    let frame = rig.settle();
    assert!(close(frame.offset.norm(), 75.0, 0.05), "{:?}", frame.offset);
    assert!(close(frame.offset.x, frame.offset.y, 0.05));
    assert!(!frame.aligned);
}

#[test]
fn rising_edge_pulses_once_per_aligned_run() {
    let rig = Rig::started();
    for _ in 0..5 {
        rig.push(ALIGNED);
    }
    assert_eq!(rig.haptic.pulses(), 1);

    rig.push(OFF_LEVEL);
    rig.push(ALIGNED);
    rig.push(ALIGNED);
    assert_eq!(rig.haptic.pulses(), 2);

    let flips = rig
        .sink
        .count(|e| matches!(e, LevelEvent::AlignmentChanged { .. }));
    assert_eq!(flips, 3);
}

#[test]
fn every_sample_mode_pulses_while_aligned() {
    let mut rig = Rig::new(LevelConfig {
        feedback: FeedbackMode::EverySample,
        ..LevelConfig::default()
    });
    rig.session.start().unwrap();
    for _ in 0..4 {
        rig.push(ALIGNED);
    }
    rig.push(OFF_LEVEL);
    assert_eq!(rig.haptic.pulses(), 4);
}

#[test]
fn malformed_sample_is_dropped_without_disturbing_target() {
    let mut rig = Rig::started();
    rig.push(OFF_LEVEL);
    let before = rig.settle();

    assert_eq!(
        rig.push(TiltSample::new(f32::NAN, 0.0, 1.0)),
        Delivery::Dropped
    );
    assert_eq!(
        rig.push(TiltSample::new(0.0, f32::INFINITY, 1.0)),
        Delivery::Dropped
    );
    let after = rig.settle();

    assert!(close(after.offset.x, before.offset.x, 1e-3));
    assert!(close(after.offset.y, before.offset.y, 1e-3));
    assert_eq!(after.readout, before.readout);
    assert_eq!(
        rig.sink.count(|e| matches!(e, LevelEvent::SampleDropped { .. })),
        2
    );
    assert!(rig
        .sink
        .events()
        .contains(&LevelEvent::SampleDropped { total: 2 }));
}

#[test]
fn newest_sample_wins_between_ticks() {
    let mut rig = Rig::started();
    rig.push(TiltSample::new(0.1, 0.0, 1.0));
    rig.push(TiltSample::new(-0.2, 0.1, 1.0));
    let frame = rig.tick().unwrap();
    assert!(close(frame.readout.x, -0.2, 1e-6));
    assert!(close(frame.readout.y, 0.1, 1e-6));
}

#[test]
fn first_frame_starts_at_center_and_moves_smoothly() {
    let mut rig = Rig::started();
    rig.push(OFF_LEVEL);
    let first = rig.session.render_tick(rig.clock).unwrap();
    assert_eq!(first.offset, Offset::CENTER);

    // 0.3 × 180 = 54 px target; one frame must not get there.
    let second = rig.tick().unwrap();
    assert!(second.offset.x > 0.0);
    assert!(second.offset.x < 54.0 * 0.5);
}

// ── Restart ──────────────────────────────────────────────────

#[test]
fn restart_reinitialises_state() {
    let mut rig = Rig::started();
    rig.push(ALIGNED);
    rig.push(TiltSample::new(f32::NAN, 0.0, 1.0));
    rig.push(TiltSample::new(0.5, 0.5, 0.7));
    rig.settle();
    rig.session.stop();
    assert!(rig.sink.events().contains(&LevelEvent::Stopped {
        accepted: 2,
        dropped: 1
    }));
    assert_eq!(rig.session.frame().offset, Offset::CENTER);

    rig.session.start().unwrap();
    assert_eq!(rig.sensor.subscribes(), 2);
    let frame = rig.tick().unwrap();
    assert_eq!(frame.offset, Offset::CENTER);
    assert!(!frame.aligned);

    // Edge state was reset, so the first aligned sample pulses again.
    rig.push(ALIGNED);
    assert_eq!(rig.haptic.pulses(), 2);

    rig.session.stop();
    assert!(rig.sink.events().contains(&LevelEvent::Stopped {
        accepted: 1,
        dropped: 0
    }));
}

#[test]
fn sink_from_previous_run_is_ignored_after_restart() {
    let mut rig = Rig::started();
    rig.session.stop();
    rig.session.start().unwrap();

    assert_eq!(rig.sensor.push_via(0, ALIGNED), Delivery::Ignored);
    assert_eq!(rig.haptic.pulses(), 0);
    assert_eq!(rig.sensor.push_via(1, ALIGNED), Delivery::Accepted);
    assert_eq!(rig.haptic.pulses(), 1);
}

// ── Commands ─────────────────────────────────────────────────

#[test]
fn color_change_applies_without_resubscribing() {
    let mut rig = Rig::started();
    assert_eq!(rig.tick().unwrap().color, IndicatorColor::Blue);

    rig.session
        .handle_command(LevelCommand::SetIndicatorColor(IndicatorColor::Orange));
    assert_eq!(rig.tick().unwrap().color, IndicatorColor::Orange);
    assert_eq!(rig.sensor.subscribes(), 1);
    assert_eq!(rig.sensor.unsubscribes(), 0);
    assert!(rig.session.is_running());

    // Same colour again is not a change.
    rig.session
        .handle_command(LevelCommand::SetIndicatorColor(IndicatorColor::Orange));
    assert_eq!(
        rig.sink.count(|e| matches!(e, LevelEvent::ColorChanged(_))),
        1
    );
}

#[test]
fn feedback_mode_switch_applies_to_running_session() {
    let mut rig = Rig::started();
    rig.push(ALIGNED);
    rig.push(ALIGNED);
    assert_eq!(rig.haptic.pulses(), 1);

    rig.session
        .handle_command(LevelCommand::SetFeedbackMode(FeedbackMode::EverySample));
    assert_eq!(rig.session.config().feedback, FeedbackMode::EverySample);
    rig.push(ALIGNED);
    rig.push(ALIGNED);
    assert_eq!(rig.haptic.pulses(), 3);
    assert_eq!(rig.sensor.subscribes(), 1);

    rig.session
        .handle_command(LevelCommand::SetFeedbackMode(FeedbackMode::RisingEdge));
    rig.push(ALIGNED);
    assert_eq!(rig.haptic.pulses(), 3, "still inside the same aligned run");
    rig.push(OFF_LEVEL);
    rig.push(ALIGNED);
    assert_eq!(rig.haptic.pulses(), 4);
}

#[test]
fn feedback_mode_survives_restart() {
    let mut rig = Rig::started();
    rig.session
        .handle_command(LevelCommand::SetFeedbackMode(FeedbackMode::EverySample));
    rig.session.stop();
    rig.session.start().unwrap();
    rig.push(ALIGNED);
    rig.push(ALIGNED);
    assert_eq!(rig.haptic.pulses(), 2);
}

#[test]
fn color_survives_restart() {
    let mut rig = Rig::started();
    rig.session
        .handle_command(LevelCommand::SetIndicatorColor(IndicatorColor::Purple));
    rig.session.stop();
    assert_eq!(rig.session.frame().color, IndicatorColor::Purple);
    rig.session.start().unwrap();
    assert_eq!(rig.tick().unwrap().color, IndicatorColor::Purple);
}
