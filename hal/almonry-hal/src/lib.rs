//! Almonry Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the donation controller is written
//! against. Chip-specific crates implement them; host tests implement them
//! with mocks and a simulated clock.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  almonry-core / almonry-drivers         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  almonry-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ almonry-hal-  │       │  host mocks   │
//! │    rp2040     │       │   (tests)     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`pwm::PwmOutput`] - Duty-cycle outputs (servo pulses)
//! - [`clock::Clock`] - Monotonic time and blocking delays

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod gpio;
pub mod pwm;

// Re-export key traits at crate root for convenience
pub use clock::Clock;
pub use gpio::{InputPin, OutputPin};
pub use pwm::PwmOutput;
