//! Real-time tick source for driving an engine from the wall clock.

use web_time::{Duration, Instant};

/// Wall-clock tick source that turns real elapsed time into `tick(dt)`
/// deltas, optionally pacing to a target rate.
#[derive(Debug)]
pub struct FrameClock {
    /// Target ticks per second (0 = unpaced).
    target_fps: u32,
    /// Minimum interval between ticks.
    min_interval: Duration,
    /// Timestamp of the previous tick.
    last_tick: Instant,
    /// Largest delta handed out, so a stalled process does not skip phases.
    max_delta: f32,
}

impl FrameClock {
    /// Clock pacing to `target_fps` (0 = unpaced).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let min_interval = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };
        Self {
            target_fps,
            min_interval,
            last_tick: Instant::now(),
            max_delta: 0.25,
        }
    }

    /// Target rate.
    #[must_use]
    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Time left before the next tick is due.
    #[must_use]
    pub fn until_next(&self) -> Duration {
        self.min_interval.saturating_sub(self.last_tick.elapsed())
    }

    /// Consume the elapsed time since the previous tick, in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        elapsed.min(self.max_delta)
    }

    /// Fixed delta for deterministic stepping at the target rate.
    #[must_use]
    pub fn fixed_delta(&self) -> f32 {
        if self.target_fps == 0 {
            1.0 / 60.0
        } else {
            self.min_interval.as_secs_f32()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_delta_matches_rate() {
        let clock = FrameClock::new(50);
        assert!((clock.fixed_delta() - 0.02).abs() < 1e-6);
        assert!((FrameClock::new(0).fixed_delta() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn tick_is_clamped() {
        let mut clock = FrameClock::new(60);
        let dt = clock.tick();
        assert!((0.0..=0.25).contains(&dt));
    }
}
