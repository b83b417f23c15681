//! Tilt Level — host demo entry point.
//!
//! Wires the simulated accelerometer to the console adapters and renders a
//! few seconds of the bubble rocking through level.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  AccelerometerAdapter  LogHaptic    LogDisplay  LogEventSink │
//! │  (SensorPort)          (HapticPort) (Display)   (EventSink)  │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ─────────────────────   │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │            Session (pure logic)                      │    │
//! │  │  Clamp · Alignment · Spring smoother                 │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! │                                                              │
//! │  Render loop (edge-executor + async-io-mini timers)          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `tiltlevel [settings.json] [seconds]`

#![deny(unused_must_use)]

use core::time::Duration;

use anyhow::{Context, Result};
use log::{error, info};

use tiltlevel::adapters::haptic::LogHaptic;
use tiltlevel::adapters::log_display::LogDisplay;
use tiltlevel::adapters::log_sink::LogEventSink;
use tiltlevel::adapters::sensor::AccelerometerAdapter;
use tiltlevel::app::commands::LevelCommand;
use tiltlevel::app::session::Session;
use tiltlevel::config::{IndicatorColor, LevelConfig};
use tiltlevel::render;
use tiltlevel::sensors::accelerometer::SimAccelerometer;

/// Peak simulated tilt; large enough to reach the travel ring.
const SWEEP_AMPLITUDE: f32 = 0.7;
const SWEEP_PERIOD_SECS: f32 = 4.0;
const DEFAULT_RUN_SECS: u64 = 6;
/// Log one frame in this many.
const DISPLAY_LOG_EVERY: u32 = 15;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("╔══════════════════════════════════════╗");
    info!("║  Tilt Level v{}                   ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let mut args = std::env::args().skip(1);

    // ── 1. Settings ───────────────────────────────────────────
    let config = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading settings from {path}"))?;
            let cfg = LevelConfig::from_json(&json)?;
            info!("Config loaded from {}", path);
            cfg
        }
        None => {
            info!("No settings file, using defaults");
            LevelConfig::default()
        }
    };
    let run_secs = match args.next() {
        Some(s) => s
            .parse::<u64>()
            .with_context(|| format!("invalid run length '{s}'"))?,
        None => DEFAULT_RUN_SECS,
    };

    // ── 2. Adapters ───────────────────────────────────────────
    let sensor = AccelerometerAdapter::new(SimAccelerometer::sweep(
        SWEEP_AMPLITUDE,
        SWEEP_PERIOD_SECS,
    ));
    let haptic = LogHaptic::new();
    let pulses = haptic.counter();
    let mut display = LogDisplay::new(DISPLAY_LOG_EVERY);

    // ── 3. Session ────────────────────────────────────────────
    let mut session = Session::new(config, sensor, haptic, LogEventSink::new())?;
    session.handle_command(LevelCommand::SetIndicatorColor(IndicatorColor::Green));

    if let Err(e) = session.start() {
        error!("Cannot start level: {} (indicator stays centered)", e);
        return Err(e.into());
    }

    // ── 4. Render until the deadline ──────────────────────────
    let stats = render::run_for(
        &mut session,
        &mut display,
        render::DEFAULT_FRAME_PERIOD,
        Duration::from_secs(run_secs),
    );

    info!(
        "Done: {} frames, {} haptic pulses",
        stats.frames,
        pulses.load(core::sync::atomic::Ordering::Relaxed)
    );
    Ok(())
}
