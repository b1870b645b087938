use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::easing::EasingFunction;

/// Phase timing. With `enabled = false` every request is applied
/// synchronously and no animation state is created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Animation", inline)]
#[serde(default)]
pub struct AnimationOptions {
    /// Animate operations (false = immediate mode).
    #[schemars(title = "Animate")]
    pub enabled: bool,
    /// Seconds one phase takes at speed 1.
    #[schemars(title = "Phase Duration", range(min = 0.05, max = 5.0), extend("step" = 0.05))]
    pub phase_seconds: f32,
    /// Playback speed multiplier.
    #[schemars(title = "Speed", range(min = 0.1, max = 10.0), extend("step" = 0.1))]
    pub speed: f32,
    /// Blink count for flash-style phases.
    #[schemars(title = "Flash Repeats", range(min = 1, max = 10))]
    pub flash_repeats: u32,
    /// Seconds between chained steps (Huffman merges, AVL morph).
    #[schemars(title = "Continuation Delay", range(min = 0.0, max = 5.0), extend("step" = 0.05))]
    pub continuation_delay: f32,
    /// Easing applied to movement phases.
    #[schemars(skip)]
    pub easing: EasingFunction,
}

impl AnimationOptions {
    /// Progress gained over `dt` seconds of wall time.
    #[must_use]
    pub fn phase_delta(&self, dt: f32) -> f32 {
        if self.phase_seconds <= 0.0 {
            return 1.0;
        }
        (dt * self.speed.max(0.0) / self.phase_seconds).max(0.0)
    }

    /// Continuation delay scaled by playback speed.
    #[must_use]
    pub fn scaled_delay(&self) -> f32 {
        if self.speed <= 0.0 {
            return self.continuation_delay;
        }
        self.continuation_delay / self.speed
    }
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            phase_seconds: 0.4,
            speed: 1.0,
            flash_repeats: 3,
            continuation_delay: 0.3,
            easing: EasingFunction::DEFAULT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_delta_scales_with_speed() {
        let mut opts = AnimationOptions::default();
        assert!((opts.phase_delta(0.2) - 0.5).abs() < 1e-6);
        opts.speed = 2.0;
        assert!((opts.phase_delta(0.2) - 1.0).abs() < 1e-6);
        assert!((opts.scaled_delay() - 0.15).abs() < 1e-6);
    }

    #[test]
    fn zero_duration_completes_phase_per_tick() {
        let opts = AnimationOptions {
            phase_seconds: 0.0,
            ..AnimationOptions::default()
        };
        assert_eq!(opts.phase_delta(0.001), 1.0);
    }
}
