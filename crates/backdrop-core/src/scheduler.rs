//! The single self-resubmitting frame callback and the shared clock.

use crate::constants::MAX_FRAME_DT_SEC;
use crate::error::EngineError;
use instant::Instant;
use std::time::Duration;

/// Monotonic difference that saturates at zero instead of panicking.
#[inline]
pub(crate) fn elapsed_between(earlier: Instant, later: Instant) -> Duration {
    if later > earlier {
        later.duration_since(earlier)
    } else {
        Duration::ZERO
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

/// Token returned by the platform for a pending display-refresh callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub i32);

/// Platform display-refresh hook (`requestAnimationFrame` in the browser).
pub trait FrameDriver {
    fn request_frame(&mut self) -> Result<FrameRequest, EngineError>;
    fn cancel_frame(&mut self, request: FrameRequest);
}

#[derive(Debug)]
pub struct FrameScheduler {
    state: SchedulerState,
    pending: Option<FrameRequest>,
    last_instant: Option<Instant>,
    time: f32,
    frames: u64,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Idle,
            pending: None,
            last_instant: None,
            time: 0.0,
            frames: 0,
        }
    }

    /// Idle → Running; submits the first frame. Any other state is a no-op.
    pub fn start(&mut self, driver: &mut dyn FrameDriver, now: Instant) -> Result<(), EngineError> {
        if self.state != SchedulerState::Idle {
            return Ok(());
        }
        self.pending = Some(driver.request_frame()?);
        self.last_instant = Some(now);
        self.state = SchedulerState::Running;
        log::info!("[frame] scheduler running");
        Ok(())
    }

    /// Called when a submitted frame fires. Returns the clamped delta in
    /// seconds, or `None` if the scheduler is no longer running.
    pub fn begin_frame(&mut self, now: Instant) -> Option<f32> {
        if self.state != SchedulerState::Running {
            return None;
        }
        self.pending = None;
        let dt = match self.last_instant {
            Some(last) => elapsed_between(last, now).as_secs_f32().min(MAX_FRAME_DT_SEC),
            None => 0.0,
        };
        self.last_instant = Some(now);
        self.time += dt;
        self.frames += 1;
        Some(dt)
    }

    /// Submit the next frame after a tick. Skipped once stopped.
    pub fn resubmit(&mut self, driver: &mut dyn FrameDriver) -> Result<(), EngineError> {
        if self.state != SchedulerState::Running || self.pending.is_some() {
            return Ok(());
        }
        self.pending = Some(driver.request_frame()?);
        Ok(())
    }

    /// Enter the terminal state and cancel the pending frame. Returns `true`
    /// the first time only.
    pub fn stop(&mut self, driver: &mut dyn FrameDriver) -> bool {
        if self.state == SchedulerState::Stopped {
            return false;
        }
        if let Some(request) = self.pending.take() {
            driver.cancel_frame(request);
        }
        let was_running = self.state == SchedulerState::Running;
        self.state = SchedulerState::Stopped;
        if was_running {
            log::info!("[frame] scheduler stopped after {} frames", self.frames);
        }
        true
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    /// Seconds accumulated across all ticks.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
