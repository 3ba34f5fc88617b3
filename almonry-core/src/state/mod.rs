//! Donation cycle state machine
//!
//! Defines the authoritative phases of the controller.
//! The state machine is explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::CycleEvent;
pub use machine::CyclePhase;
