//! Frame pacing for the host loop.

use std::thread;
use std::time::{Duration, Instant};

pub struct FrameClock {
    frame: Duration,
    epoch: Instant,
    frame_start: Instant,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        let now = Instant::now();
        Self {
            frame: frame_duration(fps),
            epoch: now,
            frame_start: now,
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// Marks the start of a frame and returns the time since the clock was
    /// created, which drives animations that run even while idle.
    pub fn begin(&mut self) -> Duration {
        self.frame_start = Instant::now();
        self.frame_start - self.epoch
    }

    /// Time left in the current frame's budget.
    pub fn remaining(&self) -> Duration {
        self.frame.saturating_sub(self.frame_start.elapsed())
    }

    /// Sleeps out whatever is left of the frame.
    pub fn pace(&self) {
        let rest = self.remaining();
        if !rest.is_zero() {
            thread::sleep(rest);
        }
    }
}

pub fn frame_duration(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / fps.max(1) as f64)
}
