//! Sensor driver implementations

pub mod hcsr04;

pub use hcsr04::HcSr04;
