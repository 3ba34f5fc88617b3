//! Distance sensing and object detection
//!
//! Converts ultrasonic echo timings into distances and decides whether a
//! deposit is sitting in the intake.

pub mod detection;
pub mod distance;

pub use detection::DetectionThresholds;
pub use distance::{Distance, Reading, SPEED_OF_SOUND_CM_PER_S};
