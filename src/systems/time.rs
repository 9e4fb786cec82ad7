//! Frame clocks.
//!
//! The scheduler restarts its clock at the beginning of a frame and reads it
//! after presentation; the reading becomes
//! [`WorldTime::delta`](crate::resources::worldtime::WorldTime) for the next
//! frame.
use std::time::{Duration, Instant};

/// Source of frame durations.
pub trait FrameClock {
    /// Mark the start of a frame.
    fn restart(&mut self);
    /// Time since the last [`FrameClock::restart`].
    fn elapsed(&self) -> Duration;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    started: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameClock for SystemClock {
    fn restart(&mut self) {
        self.started = Instant::now();
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Clock that reports a fixed, adjustable duration for every frame.
/// Used for headless runs and tests.
#[derive(Debug, Clone, Copy)]
pub struct ManualClock {
    pub frame_duration: Duration,
}

impl ManualClock {
    pub fn new(frame_duration: Duration) -> Self {
        Self { frame_duration }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }
}

impl FrameClock for ManualClock {
    fn restart(&mut self) {}

    fn elapsed(&self) -> Duration {
        self.frame_duration
    }
}
