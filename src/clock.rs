use std::thread;
use std::time::{Duration, Instant};

/// Frame pacing: blocks until the next frame boundary and reports how much
/// time really passed.
pub struct Clock {
    frame: Duration,
    last: Instant,
}

impl Clock {
    pub fn new(fps: u32) -> Self {
        Self {
            frame: Duration::from_secs_f64(1.0 / f64::from(fps.max(1))),
            last: Instant::now(),
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// Sleep out the rest of the frame, then return the milliseconds since
    /// the previous tick.
    pub fn tick(&mut self) -> f32 {
        let elapsed = self.last.elapsed();
        if elapsed < self.frame {
            thread::sleep(self.frame - elapsed);
        }
        let now = Instant::now();
        let delta = now.duration_since(self.last);
        self.last = now;
        delta.as_secs_f32() * 1000.0
    }
}
