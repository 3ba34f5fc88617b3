//! Actuator traits
//!
//! None of the actuators report position. Their state is whatever was last
//! commanded.

/// Door lock with a position indicator
///
/// `engage` and `release` only issue commands; the sequencer owns the settle
/// time and calls `relax` afterwards.
pub trait LockActuator {
    /// De-energise the lock and move the indicator to "locked"
    fn engage(&mut self);

    /// Energise the lock and move the indicator to "unlocked"
    fn release(&mut self);

    /// Stop driving the indicator once it has settled
    fn relax(&mut self) {}
}

/// Four drive lines of one stepper mechanism
pub trait CoilDriver {
    /// Drive the four lines to one phase of the step table
    fn energize(&mut self, phase: [bool; 4]);

    /// Drive all four lines low
    fn de_energize(&mut self) {
        self.energize([false; 4]);
    }

    /// Lines as last commanded
    fn phase(&self) -> [bool; 4];
}

/// Conveyor belt drive
pub trait BeltDrive {
    /// Start or stop the belt
    fn set_running(&mut self, running: bool);

    /// Check if the belt was last commanded to run
    fn is_running(&self) -> bool;
}
