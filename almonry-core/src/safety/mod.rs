//! Safety gating
//!
//! Decides whether it is safe to open the intake.

pub mod motion;

pub use motion::{observe_motion_window, MotionDebounce, MotionSample, MotionVerdict};
