//! Conveyor belt relay
//!
//! Plain on/off with an optional inverted coil input, as found on the
//! common opto-isolated relay boards.

use almonry_core::traits::BeltDrive;
use almonry_hal::OutputPin;

/// Pin level that leaves the belt stopped
///
/// Board code should create the relay pin at this level so the belt never
/// pulses on between pin setup and `Relay::new`.
pub const fn idle_high(active_low: bool) -> bool {
    active_low
}

pub struct Relay<P> {
    pin: P,
    /// If true, belt on = pin LOW
    active_low: bool,
    running: bool,
}

impl<P: OutputPin> Relay<P> {
    /// Create a relay output; the belt starts stopped
    pub fn new(pin: P, active_low: bool) -> Self {
        let mut relay = Self {
            pin,
            active_low,
            running: false,
        };
        relay.set_running(false);
        relay
    }
}

impl<P: OutputPin> BeltDrive for Relay<P> {
    fn set_running(&mut self, running: bool) {
        self.running = running;
        self.pin.set_state(running != self.active_low);
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
