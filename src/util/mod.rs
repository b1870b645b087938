//! Shared utilities: easing curves and the wall-clock tick source.

pub mod easing;
pub mod frame_clock;
