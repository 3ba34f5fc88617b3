//! RP2040 HAL for the donation controller firmware
//!
//! This crate implements the shared `almonry-hal` traits on top of
//! embassy-rp and embassy-time:
//!
//! - [`clock::EmbassyClock`] - uptime and blocking delays for the control core
//! - [`pwm::ServoPwm`] - 50 Hz PWM channel for the lock flag servo
//!
//! GPIO needs no wrapper here: embassy-rp pins implement embedded-hal 1.0
//! and go through `almonry_drivers::compat`.

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod pwm;

pub use clock::EmbassyClock;
pub use pwm::ServoPwm;
