//! Actuator driver implementations
//!
//! - Lock: solenoid H-bridge channels plus a servo flag
//! - Coils: four-line unipolar stepper drive
//! - Relay: conveyor belt on/off

pub mod coils;
pub mod lock;
pub mod relay;
pub mod servo;

pub use coils::FourWireCoils;
pub use lock::{HBridgeChannel, SolenoidLock};
pub use relay::Relay;
pub use servo::HobbyServo;
