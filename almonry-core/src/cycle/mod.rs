//! Donation cycle controller
//!
//! Ties sensing, the motion gate and the actuator sequencer together into
//! the button-driven cycle.

pub mod board;
pub mod controller;

pub use board::{Board, Peripherals};
pub use controller::{CycleOutcome, DonationCycle};
