//! Door stepper drive
//!
//! Each door is moved by a unipolar stepper on four drive lines. One "step"
//! walks the whole four-phase full-step table, pausing `step_delay_ms` after
//! every phase.

use almonry_hal::Clock;

use crate::config::{StepOrder, Stroke};
use crate::traits::CoilDriver;

/// Full-step drive table, lines IN1..IN4
pub const FULL_STEP: [[bool; 4]; 4] = [
    [true, false, true, false],
    [false, true, true, false],
    [false, true, false, true],
    [true, false, false, true],
];

/// Door position as last commanded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DoorState {
    Closed,
    Opening,
    Open,
    Closing,
}

/// Map a table phase onto the drive lines for a stroke's ordering
///
/// `Reversed` wires the table to the lines in reverse (IN4..IN1), which
/// turns the motor the other way.
pub fn wired_phase(order: StepOrder, phase: [bool; 4]) -> [bool; 4] {
    match order {
        StepOrder::Normal => phase,
        StepOrder::Reversed => [phase[3], phase[2], phase[1], phase[0]],
    }
}

/// Run two mechanisms phase by phase until the longer stroke is done
///
/// A mechanism whose stroke is complete is held de-energised while the other
/// finishes. Both are de-energised on return.
pub fn drive_lockstep<A, B, C>(
    a: &mut A,
    a_stroke: Stroke,
    b: &mut B,
    b_stroke: Stroke,
    clock: &C,
    step_delay_ms: u32,
) where
    A: CoilDriver + ?Sized,
    B: CoilDriver + ?Sized,
    C: Clock + ?Sized,
{
    let total = a_stroke.steps.max(b_stroke.steps);

    for step in 0..total {
        for phase in FULL_STEP {
            drive_phase(a, a_stroke, step, phase);
            drive_phase(b, b_stroke, step, phase);
            clock.delay_ms(step_delay_ms);
        }
    }

    a.de_energize();
    b.de_energize();
}

fn drive_phase<D: CoilDriver + ?Sized>(coils: &mut D, stroke: Stroke, step: u16, phase: [bool; 4]) {
    if step < stroke.steps {
        coils.energize(wired_phase(stroke.order, phase));
    } else if coils.phase() != [false; 4] {
        coils.de_energize();
    }
}
