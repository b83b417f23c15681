//! Render-domain loop — frame-paced smoother ticks.
//!
//! Runs on the caller's thread using `edge-executor` for cooperative
//! scheduling and `async-io-mini` reactor timers for frame pacing.  Two
//! futures share the executor:
//!
//! 1. **Render**: one [`Session::render_tick`] per frame period, handing
//!    each [`Frame`](crate::app::ports::Frame) to the [`DisplayPort`]
//! 2. **Deadline** (only in [`run_for`]): sleeps, then cancels the session
//!    through its [`StopHandle`](crate::app::session::StopHandle)
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────┐
//!  │  futures_lite::future::block_on                      │
//!  │  ┌────────────────────────────────────────────────┐  │
//!  │  │  edge_executor::LocalExecutor                  │  │
//!  │  │  ┌──────────────────┐   ┌──────────────────┐   │  │
//!  │  │  │ Render           │   │ Deadline         │   │  │
//!  │  │  │ frame period ⏱   │   │ duration ⏱ → stop│   │  │
//!  │  │  └──────────────────┘   └──────────────────┘   │  │
//!  │  └────────────────────────────────────────────────┘  │
//!  └──────────────────────────────────────────────────────┘
//! ```

use core::time::Duration;
use std::time::Instant;

use log::{debug, info};

use crate::app::ports::{DisplayPort, SensorPort};
use crate::app::session::Session;

/// ~60 Hz.
pub const DEFAULT_FRAME_PERIOD: Duration = Duration::from_micros(16_667);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames handed to the display.
    pub frames: u32,
}

/// Tick `session` once per `frame_period` until it stops or is cancelled.
pub async fn run_render_loop<S, D>(
    session: &mut Session<S>,
    display: &mut D,
    frame_period: Duration,
) -> RenderStats
where
    S: SensorPort,
    D: DisplayPort,
{
    let mut stats = RenderStats::default();
    while let Some(frame) = session.render_tick(Instant::now()) {
        display.present(&frame);
        stats.frames = stats.frames.saturating_add(1);
        async_io_mini::Timer::after(frame_period).await;
    }
    debug!("Render loop exited after {} frames", stats.frames);
    stats
}

/// Render a started session for `duration`, then end it.
///
/// Returns immediately (with zero frames) when the session is not running.
pub fn run_for<S, D>(
    session: &mut Session<S>,
    display: &mut D,
    frame_period: Duration,
    duration: Duration,
) -> RenderStats
where
    S: SensorPort,
    D: DisplayPort,
{
    let executor: edge_executor::LocalExecutor<'_, 4> = edge_executor::LocalExecutor::new();

    let stop = session.stop_handle();
    executor
        .spawn(async move {
            async_io_mini::Timer::after(duration).await;
            stop.stop();
        })
        .detach();

    info!(
        "Render loop started ({}ms frames, {}ms run)",
        frame_period.as_millis(),
        duration.as_millis()
    );
    let stats = futures_lite::future::block_on(
        executor.run(run_render_loop(session, display, frame_period)),
    );

    session.stop();
    stats
}
