//! Phase definition and transition table

use almonry_protocol::PhaseCode;

use super::events::CycleEvent;
use crate::traits::Lamp;

/// Controller phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CyclePhase {
    /// Polling the donate button
    #[default]
    Idle,
    /// Button pressed, taking distance readings
    Triggered,
    /// Object present, running the motion gate
    Evaluating,
    /// Person detected, showing the not-safe indication
    Aborting,
    /// Running the lock/door/belt sequence
    Admitting,
    /// Outputs forced safe after an external stop
    Stopped,
}

impl CyclePhase {
    /// Steady lamp pattern for this phase
    ///
    /// `Aborting` flashes; this is the lit half of the flash.
    pub fn lamp(&self) -> Lamp {
        match self {
            CyclePhase::Idle | CyclePhase::Triggered | CyclePhase::Evaluating => Lamp::Ready,
            CyclePhase::Admitting => Lamp::Go,
            CyclePhase::Aborting => Lamp::NotSafe,
            CyclePhase::Stopped => Lamp::Off,
        }
    }

    /// Wire representation
    pub fn code(&self) -> PhaseCode {
        match self {
            CyclePhase::Idle => PhaseCode::Idle,
            CyclePhase::Triggered => PhaseCode::Triggered,
            CyclePhase::Evaluating => PhaseCode::Evaluating,
            CyclePhase::Aborting => PhaseCode::Aborting,
            CyclePhase::Admitting => PhaseCode::Admitting,
            CyclePhase::Stopped => PhaseCode::Stopped,
        }
    }

    /// Process an event and return the next phase
    ///
    /// Unknown pairs keep the current phase.
    pub fn transition(self, event: CycleEvent) -> Self {
        use CycleEvent::*;
        use CyclePhase::*;

        match (self, event) {
            // Stopped is terminal
            (Stopped, _) => Stopped,
            (_, Shutdown) => Stopped,

            (Idle, TriggerPressed) => Triggered,

            (Triggered, ObjectDetected) => Evaluating,
            (Triggered, NoObject) => Idle,

            (Evaluating, MotionSafe) => Admitting,
            (Evaluating, PersonPresent) => Aborting,

            (Aborting, AbortHandled) => Idle,

            (Admitting, AdmitComplete) => Idle,

            // Default: stay in current phase
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CyclePhase; 6] = [
        CyclePhase::Idle,
        CyclePhase::Triggered,
        CyclePhase::Evaluating,
        CyclePhase::Aborting,
        CyclePhase::Admitting,
        CyclePhase::Stopped,
    ];

    #[test]
    fn test_admit_path() {
        let phase = CyclePhase::Idle
            .transition(CycleEvent::TriggerPressed)
            .transition(CycleEvent::ObjectDetected)
            .transition(CycleEvent::MotionSafe);
        assert_eq!(phase, CyclePhase::Admitting);
        assert_eq!(phase.transition(CycleEvent::AdmitComplete), CyclePhase::Idle);
    }

    #[test]
    fn test_abort_path() {
        let phase = CyclePhase::Idle
            .transition(CycleEvent::TriggerPressed)
            .transition(CycleEvent::ObjectDetected)
            .transition(CycleEvent::PersonPresent);
        assert_eq!(phase, CyclePhase::Aborting);
        assert_eq!(phase.transition(CycleEvent::AbortHandled), CyclePhase::Idle);
    }

    #[test]
    fn test_no_object_skips_gate() {
        let phase = CyclePhase::Triggered.transition(CycleEvent::NoObject);
        assert_eq!(phase, CyclePhase::Idle);
    }

    #[test]
    fn test_cannot_skip_the_gate() {
        // Motion outcomes mean nothing before an object is found
        assert_eq!(
            CyclePhase::Triggered.transition(CycleEvent::MotionSafe),
            CyclePhase::Triggered
        );
        assert_eq!(
            CyclePhase::Idle.transition(CycleEvent::MotionSafe),
            CyclePhase::Idle
        );
    }

    #[test]
    fn test_shutdown_from_any_phase() {
        for phase in ALL {
            assert_eq!(phase.transition(CycleEvent::Shutdown), CyclePhase::Stopped);
        }
        assert_eq!(
            CyclePhase::Stopped.transition(CycleEvent::TriggerPressed),
            CyclePhase::Stopped
        );
    }

    #[test]
    fn test_wire_codes_round_trip() {
        for phase in ALL {
            assert_eq!(PhaseCode::from_byte(phase.code().to_byte()), Some(phase.code()));
        }
    }

    #[test]
    fn test_lamp_per_phase() {
        assert_eq!(CyclePhase::Evaluating.lamp(), Lamp::Ready);
        assert_eq!(CyclePhase::Admitting.lamp(), Lamp::Go);
        assert_eq!(CyclePhase::Stopped.lamp(), Lamp::Off);
    }
}
