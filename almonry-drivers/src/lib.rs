//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in almonry-core for the donation box hardware:
//!
//! - Ultrasonic ranger (HC-SR04)
//! - Door lock (solenoid H-bridge channels with a servo flag)
//! - Unipolar stepper coils for the two door mechanisms
//! - Conveyor belt relay
//! - Status lamp
//! - Adapters for embedded-hal 1.0 pins

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod actuator;
pub mod compat;
pub mod indicator;
pub mod sensor;

#[cfg(test)]
pub(crate) mod mock;
