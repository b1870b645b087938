//! Easing curves applied to phase progress before positions are
//! interpolated.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Easing function variants for animation curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Quadratic ease-in (slow start, fast end).
    QuadraticIn,
    /// Quadratic ease-out (fast start, slow end).
    QuadraticOut,
    /// Smoothstep: slow at both ends.
    SmoothStep,
    /// Cubic Hermite with configurable control points:
    /// `c1·3t(1-t)² + c2·3(1-t)t² + t³`.
    CubicHermite {
        /// First control point.
        c1: f32,
        /// Second control point.
        c2: f32,
    },
}

impl EasingFunction {
    /// Default curve: a gentle ease-out.
    pub const DEFAULT: Self = Self::CubicHermite { c1: 0.33, c2: 1.0 };

    /// Evaluate at `t`, clamped to `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadraticIn => t * t,
            Self::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
            Self::CubicHermite { c1, c2 } => {
                let omt = 1.0 - t;
                c1 * 3.0 * t * omt * omt + c2 * 3.0 * omt * t * t + t * t * t
            }
        }
    }
}

impl Default for EasingFunction {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        for easing in [
            EasingFunction::Linear,
            EasingFunction::QuadraticIn,
            EasingFunction::QuadraticOut,
            EasingFunction::SmoothStep,
            EasingFunction::DEFAULT,
        ] {
            assert_eq!(easing.evaluate(0.0), 0.0, "{easing:?}");
            assert!((easing.evaluate(1.0) - 1.0).abs() < 1e-6, "{easing:?}");
        }
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(EasingFunction::Linear.evaluate(-0.5), 0.0);
        assert_eq!(EasingFunction::Linear.evaluate(1.5), 1.0);
    }

    #[test]
    fn default_eases_out() {
        assert!(EasingFunction::default().evaluate(0.25) > 0.25);
        assert_eq!(EasingFunction::QuadraticOut.evaluate(0.5), 0.75);
    }

    #[test]
    fn parses_from_toml_name() {
        #[derive(Deserialize)]
        struct Holder {
            easing: EasingFunction,
        }
        let holder: Holder = toml::from_str("easing = \"smooth_step\"").unwrap();
        assert_eq!(holder.easing, EasingFunction::SmoothStep);
    }
}
