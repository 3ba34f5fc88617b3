//! Four-line unipolar stepper drive (ULN2003 style)
//!
//! The step table and pin ordering live in the sequencer; this driver only
//! puts a phase on the wires.

use almonry_core::traits::CoilDriver;
use almonry_hal::OutputPin;

pub struct FourWireCoils<P> {
    lines: [P; 4],
    phase: [bool; 4],
}

impl<P: OutputPin> FourWireCoils<P> {
    /// Take the four lines in wiring order; all start de-energised
    pub fn new(lines: [P; 4]) -> Self {
        let mut coils = Self {
            lines,
            phase: [true; 4],
        };
        coils.de_energize();
        coils
    }
}

impl<P: OutputPin> CoilDriver for FourWireCoils<P> {
    fn energize(&mut self, phase: [bool; 4]) {
        for (line, &high) in self.lines.iter_mut().zip(phase.iter()) {
            line.set_state(high);
        }
        self.phase = phase;
    }

    fn phase(&self) -> [bool; 4] {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPin;

    #[test]
    fn test_lines_follow_phase() {
        let lines: [MockPin; 4] = Default::default();
        let mut coils = FourWireCoils::new(lines.clone());
        assert_eq!(coils.phase(), [false; 4]);

        coils.energize([true, false, true, false]);
        assert_eq!(
            [lines[0].high(), lines[1].high(), lines[2].high(), lines[3].high()],
            [true, false, true, false]
        );

        coils.de_energize();
        assert!(lines.iter().all(|l| !l.high()));
        assert_eq!(coils.phase(), [false; 4]);
    }
}
