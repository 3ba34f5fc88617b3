//! Board-agnostic core logic for the donation intake controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (ranger, lock, coils, belt, lamp)
//! - Object detection from ultrasonic distance readings
//! - Motion gate debouncing
//! - Actuator sequencing with interlocks
//! - The donation cycle state machine and controller
//! - Status events, the viewer feed and configuration types

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod cycle;
pub mod safety;
pub mod sensing;
pub mod sequencer;
pub mod state;
pub mod status;
pub mod traits;

#[cfg(test)]
pub(crate) mod sim;
