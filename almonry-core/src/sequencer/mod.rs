//! Actuator sequencing
//!
//! Lock, doors and belt are driven open-loop: nothing reports back, so the
//! sequencer's own record of what it last commanded is the only state there
//! is. The interlocks in `ActuatorSequencer` enforce the order
//! lock → doors → belt → doors → lock on that record.

pub mod actuators;
pub mod doors;

pub use actuators::{ActuatorSequencer, BeltRun, InterlockError, LockState};
pub use doors::{drive_lockstep, wired_phase, DoorState, FULL_STEP};

use almonry_hal::Clock;

/// Block for at least `us` microseconds
pub(crate) fn delay_at_least_us<C: Clock + ?Sized>(clock: &C, mut us: u64) {
    while us > 0 {
        let chunk = us.min(u32::MAX as u64);
        clock.delay_us(chunk as u32);
        us -= chunk;
    }
}
