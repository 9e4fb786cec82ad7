use std::time::Duration;

/// Frame timing shared by the scheduler, physics and animations.
///
/// `delta` is the measured duration of the previous frame. It is consumed
/// unclamped: a long stall makes the following frame integrate and animate
/// proportionally further. Callers that need stability clamp before
/// [`WorldTime::advance`].
#[derive(Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: Duration,
    pub delta: Duration,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: Duration::ZERO,
            delta: Duration::from_micros(16_667),
            frame_count: 0,
        }
    }
}

impl WorldTime {
    /// Delta in fractional milliseconds, the unit physics integrates with.
    pub fn delta_millis(&self) -> f32 {
        self.delta.as_secs_f32() * 1000.0
    }

    /// Frames per second implied by the current delta.
    pub fn fps(&self) -> f32 {
        let secs = self.delta.as_secs_f32();
        if secs > 0.0 { 1.0 / secs } else { 0.0 }
    }

    /// Record a finished frame of the given duration.
    pub fn advance(&mut self, frame_duration: Duration) {
        self.delta = frame_duration;
        self.elapsed += frame_duration;
        self.frame_count += 1;
    }
}
